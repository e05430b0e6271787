pub mod json_api;
pub mod session;

pub use json_api::{
    MatchSnapshot, PlayerSnapshot, QuestionSnapshot, SelectSkinRequest, StartMatchRequest,
};
pub use session::GameSession;
