mod cache_aside;

pub mod error;
pub use error::ServiceError;

pub mod team_service;
pub mod team_service_impl;
pub use team_service::TeamService;
pub use team_service_impl::CachedTeamService;

pub mod statistics_service;
pub mod statistics_service_impl;
pub use statistics_service::StatisticsService;
pub use statistics_service_impl::CachedStatisticsService;

pub mod fixture_service;
pub mod fixture_service_impl;
pub use fixture_service::FixtureService;
pub use fixture_service_impl::CachedFixtureService;

pub mod standings_service;
pub mod standings_service_impl;
pub use standings_service::StandingsService;
pub use standings_service_impl::CachedStandingsService;

pub mod news;
pub use news::{DerivedNewsGenerator, NewsGenerator};

pub mod dispatcher;
pub use dispatcher::{DispatchError, IntentDispatcher, Side};

pub mod answer;
pub use answer::{
    AnswerComposer, AnswerError, AnswerService, ClassifyError, ComposeError, IntentClassifier,
};
