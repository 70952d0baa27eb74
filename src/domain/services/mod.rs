pub mod calendar;
pub mod comment_thread;
pub mod event_registry;
pub mod invitation_ledger;
pub mod notifier;
pub mod participant_roster;
