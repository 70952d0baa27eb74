use crate::domain::models::{event::Event, participant::Participant};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike, Property};

/// Generates an iCalendar (.ics) document for an event and its roster.
pub fn generate_ics(event: &Event, participants: &[Participant]) -> String {
    let mut ical_event = IcalEvent::new();
    ical_event
        .summary(&event.name)
        .description(&event.description)
        .location(&event.location)
        .starts(event.start_time)
        .ends(event.end_time)
        .uid(&event.id);

    if let Some(link) = &event.link {
        ical_event.add_property("URL", link.as_str());
    }

    let mut organizer = Property::new("ORGANIZER", format!("mailto:{}", event.organizer_email).as_str());
    if !event.organizer_name.is_empty() {
        organizer.add_parameter("CN", event.organizer_name.as_str());
    }
    ical_event.append_property(organizer);

    for participant in participants {
        let mut attendee = Property::new("ATTENDEE", format!("mailto:{}", participant.email).as_str());
        attendee.add_parameter("CN", participant.name.as_str());
        ical_event.append_multi_property(attendee);
    }

    let mut calendar = Calendar::new();
    calendar.push(ical_event.done());
    calendar.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event::NewEventParams;
    use chrono::{Duration, Utc};

    #[test]
    fn ics_carries_event_and_attendees() {
        let start = Utc::now() + Duration::days(1);
        let event = Event::new(NewEventParams {
            name: "Picnic".into(),
            location: "Park".into(),
            start_time: start,
            end_time: start + Duration::hours(2),
            organizer_email: "org@example.com".into(),
            organizer_name: Some("Org".into()),
            description: Some("Bring snacks".into()),
            link: Some("https://example.com/picnic".into()),
            image_url: None,
            capacity: None,
        }).unwrap();
        let guest = Participant::new(event.id.clone(), "Ada".into(), "ada@example.com".into());

        let ics = generate_ics(&event, &[guest]);
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("SUMMARY:Picnic"));
        assert!(ics.contains(&format!("UID:{}", event.id)));
        assert!(ics.contains("mailto:ada@example.com"));
        assert!(ics.contains("mailto:org@example.com"));
        assert!(!ics.contains(&event.edit_id));
    }
}
