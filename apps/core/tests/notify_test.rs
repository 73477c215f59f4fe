use photocull_core::notify::{truncate_message, MockNotifier, Notifier, NotifyEvent};

#[test]
fn short_messages_pass_through_unchanged() {
    assert_eq!(truncate_message("saved", 60), "saved");
}

#[test]
fn long_messages_are_clamped_by_character_count() {
    let long = "DSC_0042.NEF saved. Sorted 128 of 4096 candidates so far today";
    let clamped = truncate_message(long, 20);
    assert_eq!(clamped.chars().count(), 20);
    assert!(long.starts_with(&clamped));
}

#[test]
fn truncation_respects_multibyte_boundaries() {
    let text = "фото отобрано успешно";
    let clamped = truncate_message(text, 4);
    assert_eq!(clamped, "фото");
}

#[test]
fn mock_notifier_records_events_in_order() {
    let notifier = MockNotifier::default();
    let mut boxed: Box<dyn Notifier> = Box::new(notifier.clone());

    boxed.success("first");
    boxed.error("second", true);

    assert_eq!(
        notifier.events(),
        vec![
            NotifyEvent::Success("first".to_string()),
            NotifyEvent::Error {
                text: "second".to_string(),
                extended: true,
            },
        ]
    );
}
