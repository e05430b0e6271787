pub mod player;
pub mod question;
pub mod skin;

pub use player::Player;
pub use question::{Difficulty, Question};
pub use skin::{find_skin, Skin, DEFAULT_SKIN_ID, SKINS};
