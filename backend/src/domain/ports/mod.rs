//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports are the use-case traits the HTTP adapter calls; driven
//! ports are the repository and hashing traits the domain services call.
//! Each driven port ships a `Fixture*` implementation representing the
//! unprovisioned-store degrade path, and a mockall mock for unit tests.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod article_repository;
mod category_query;
mod category_repository;
mod feed_query;
mod history_command;
mod history_repository;
mod identity_resolver;
mod password_hasher;
mod preference_command;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, LoginOutcome, RegisterOutcome, RegisterRequest};
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleRepository, ArticleRepositoryError, FixtureArticleRepository};
#[cfg(test)]
pub use category_query::MockCategoryQuery;
pub use category_query::{CategoryQuery, PreferencesOverview};
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{
    CategoryRepository, CategoryRepositoryError, FixtureCategoryRepository,
};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::FeedQuery;
#[cfg(test)]
pub use history_command::{MockHistoryCommand, MockHistoryQuery};
pub use history_command::{HistoryCommand, HistoryQuery};
#[cfg(test)]
pub use history_repository::MockHistoryRepository;
pub use history_repository::{FixtureHistoryRepository, HistoryRepository, HistoryRepositoryError};
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{CookieDirective, IdentityResolution, IdentityResolver, RequestContext};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use preference_command::MockPreferenceCommand;
pub use preference_command::{PreferenceCommand, SetVisibilityRequest};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, NewRegisteredAccount, StoredCredentials, UserRepository,
    UserRepositoryError,
};
