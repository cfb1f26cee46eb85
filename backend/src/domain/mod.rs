//! Domain entities, value objects, and services.
//!
//! Purpose: define the strongly typed core of the feed-ranking and
//! personalization engine, independent of HTTP and persistence concerns.
//! Services implement the driving ports in [`ports`] over the driven
//! repository ports; adapters on either side stay thin.

pub mod accounts;
pub mod article;
pub mod category;
pub mod error;
pub mod feed;
pub mod feed_service;
pub mod history;
pub mod history_service;
pub mod identity;
pub mod interests;
pub mod ports;
pub mod preferences;
pub mod sample_feed;
pub mod store;
pub mod user;

pub use self::accounts::{AccountService, PASSWORD_MIN};
pub use self::article::{Article, ArticleId, CategoryRef};
pub use self::category::{
    CUSTOM_CATEGORY_LIMIT, Category, CategoryId, CategoryListing, CategoryPreference,
    CategoryWithPreference, CustomCategory, CustomCategoryId,
};
pub use self::error::{Error, ErrorCode};
pub use self::feed::{ArticleFilter, DEFAULT_PAGE_LIMIT, FeedPage, FeedRequest, PageWindow};
pub use self::feed_service::FeedService;
pub use self::history::{DEFAULT_HISTORY_LIMIT, HistoryEntry};
pub use self::history_service::HistoryService;
pub use self::identity::IdentityService;
pub use self::interests::{INTEREST_LIMIT, InterestInferencer};
pub use self::preferences::PreferenceService;
pub use self::store::StoreAvailability;
pub use self::user::{
    USERNAME_MAX, User, UserId, UserKind, UserValidationError, Username, email_has_valid_shape,
};

/// Convenient result alias for code returning the domain [`Error`].
pub type ApiResult<T> = Result<T, Error>;
