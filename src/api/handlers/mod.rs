pub mod comment;
pub mod event;
pub mod health;
pub mod invitation;
pub mod participant;
pub mod personalized_invitation;
