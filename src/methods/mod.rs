pub mod clients_interests;
pub mod online_score;

pub use self::clients_interests::{ClientsInterestsHandler, ClientsInterestsRequest};
pub use self::online_score::{OnlineScoreHandler, OnlineScoreRequest, ADMIN_SCORE};
