//! Page furniture around the widget: clock, navigation highlight and
//! transient banners.

pub mod clock;
pub mod nav;
pub mod notifications;

pub use clock::PageClock;
pub use nav::{NavLink, default_links, is_active, mark_active};
pub use notifications::{Banner, BannerId, BannerQueue, Level};
