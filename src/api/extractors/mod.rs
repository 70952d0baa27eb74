pub mod organizer;
