mod place;
mod user_list;

pub use place::{Coordinates, Place, PlaceImage};
pub use user_list::UserPlaceList;
