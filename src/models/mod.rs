pub mod fixture;
pub mod standings;
pub mod statistics;
pub mod team;

pub use fixture::{Fixture, FixtureQuery, LiveFixture, RoundQuery, RoundWindow};
pub use standings::{StandingRow, StandingsResponse};
pub use statistics::{ComparisonData, TeamComparison};
pub use team::{Team, TeamSummary};
