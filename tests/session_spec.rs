use mindtrack::error::ValidationError;
use mindtrack::ids::SequentialIds;
use mindtrack::models::*;
use speculate2::speculate;

fn build(ids: &SequentialIds, kind: impl Into<SessionKind>) -> Session {
    Session::new(
        ids,
        CreateSessionInput::new("Practice", "Studio B")
            .duration(25.0)
            .difficulty("Intermedio"),
        kind,
    )
    .expect("Failed to build session")
}

/// Info with the identity fields blanked so two sessions can be compared by content.
fn content(info: &SessionInfo) -> SessionInfo {
    let mut info = info.clone();
    info.id = "".into();
    info.date_created = chrono::DateTime::<chrono::Utc>::MIN_UTC;
    info
}

fn customized_variants() -> Vec<SessionKind> {
    let guided = GuidedMeditation::new("Gratitude", "Warm male voice", false).unwrap();

    let mut breathing = BreathingExercise::new("Coherent breathing", 12).unwrap();
    breathing.set_timing(5, 0, 5).unwrap();

    let mut yoga = YogaSession::new("Yin", "Lower back").unwrap();
    yoga.add_pose("Butterfly").unwrap();
    yoga.add_pose("Dragon").unwrap();
    yoga.add_equipment("Bolster").unwrap();

    let mut mindful = MindfulnessExercise::new("Raisin exercise", "Kitchen").unwrap();
    mindful.add_sense("Taste").unwrap();
    mindful.add_sense("Smell").unwrap();

    vec![guided.into(), breathing.into(), yoga.into(), mindful.into()]
}

speculate! {
    before {
        let ids = SequentialIds::new("s");
    }

    describe "activation" {
        it "reports a second activate as unsuccessful and stays active" {
            let mut session = build(&ids, GuidedMeditation::default());

            assert!(session.is_active());
            let first = session.activate();
            let second = session.activate();

            assert!(!first.success);
            assert!(!second.success);
            assert!(second.message.contains("already active"));
            assert!(session.is_active());
        }

        it "toggles through deactivate and activate" {
            let mut session = build(&ids, BreathingExercise::default());

            let off = session.deactivate();
            assert!(off.success);
            assert!(!session.is_active());

            let on = session.activate();
            assert!(on.success);
            assert!(session.is_active());
        }
    }

    describe "duration" {
        it "reads back every valid value" {
            let mut session = build(&ids, YogaSession::default());
            for minutes in [0.5, 1.0, 17.25, 90.0, 600.0] {
                session.set_duration(minutes).unwrap();
                assert_eq!(session.duration(), minutes);
            }
        }

        it "keeps the prior value on invalid input" {
            let mut session = build(&ids, YogaSession::default());
            for minutes in [0.0, -1.0, -0.001] {
                let err = session.set_duration(minutes).unwrap_err();
                assert!(matches!(err, ValidationError::NotPositive { field: "duration", .. }));
                assert_eq!(session.duration(), 25.0);
            }
        }
    }

    describe "info" {
        it "includes the fields of the variant" {
            let kinds = customized_variants();
            let yoga = build(&ids, kinds[2].clone());

            let json = serde_json::to_value(yoga.info()).unwrap();
            assert_eq!(json["type"], "YogaSession");
            assert_eq!(json["style"], "Yin");
            assert_eq!(json["poses"], serde_json::json!(["Butterfly", "Dragon"]));
            assert_eq!(json["calories"], 125.0);
            assert_eq!(json["instructor"], "unassigned");
        }

        it "rebuilds an equal session of every variant from its info" {
            for kind in customized_variants() {
                let mut original = build(&ids, kind);
                original.set_instructor("Mara").unwrap();
                original.deactivate();
                let info = original.info();

                let rebuilt = Session::from_info(&ids, &info).unwrap();

                assert_ne!(rebuilt.id(), original.id());
                assert_eq!(content(&rebuilt.info()), content(&info));
            }
        }

        it "rejects info that breaks a field rule" {
            let mut info = build(&ids, MindfulnessExercise::default()).info();
            info.location = "  ".to_string();

            assert_eq!(
                Session::from_info(&ids, &info).unwrap_err(),
                ValidationError::EmptyField { field: "location" }
            );
        }
    }

    describe "calories" {
        it "uses five per minute for yoga and three otherwise" {
            for kind in customized_variants() {
                let session = build(&ids, kind);
                let rate = if session.session_type() == SessionType::YogaSession { 5.0 } else { 3.0 };
                assert_eq!(session.estimate_calories(), session.duration() * rate);
            }
        }
    }
}
