pub mod credits;
pub mod favorite;
pub mod genre;
pub mod movie;
pub mod user;
pub mod video;
pub mod watchlist;

pub use credits::{CastMember, Credits, CrewMember};
pub use favorite::FavoriteEntry;
pub use genre::Genre;
pub use movie::{MovieDetails, MovieRef, Page};
pub use user::{UserProfile, UserRecord};
pub use video::Video;
pub use watchlist::WatchlistEntry;
