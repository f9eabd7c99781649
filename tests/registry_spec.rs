use mindtrack::config::RegistryConfig;
use mindtrack::error::{Collection, RegistryError};
use mindtrack::ids::{EntityId, SequentialIds};
use mindtrack::models::*;
use mindtrack::registry::{query, Registry, RegistryStats};
use speculate2::speculate;

fn test_registry() -> Registry {
    Registry::with_id_source(RegistryConfig::default(), SequentialIds::new("t"))
}

fn add_session(
    reg: &mut Registry,
    name: &str,
    minutes: f64,
    difficulty: &str,
    kind: impl Into<SessionKind>,
) -> EntityId {
    let session = Session::new(
        reg.ids(),
        CreateSessionInput::new(name, "Studio")
            .duration(minutes)
            .difficulty(difficulty),
        kind,
    )
    .expect("Failed to build session");
    reg.add_session(session)
        .expect("Failed to add session")
        .id()
        .clone()
}

fn add_practitioner(reg: &mut Registry, name: &str, email: &str) -> EntityId {
    let person = Person::practitioner(
        reg.ids(),
        CreatePersonInput::new(name, email),
        MembershipType::Basic,
    )
    .expect("Failed to build practitioner");
    reg.add_user(person).expect("Failed to add user").id().clone()
}

fn add_instructor(reg: &mut Registry, name: &str, email: &str) -> EntityId {
    let person = Person::instructor(reg.ids(), CreatePersonInput::new(name, email), "Yoga", 5)
        .expect("Failed to build instructor");
    reg.add_user(person).expect("Failed to add user").id().clone()
}

fn names(sessions: &[&Session]) -> Vec<String> {
    sessions.iter().map(|s| s.name().to_string()).collect()
}

speculate! {
    before {
        let mut reg = test_registry();
    }

    describe "sessions" {
        describe "add_session" {
            it "stores the session and returns it" {
                let id = add_session(&mut reg, "Calm", 20.0, "Principiante", GuidedMeditation::default());

                assert_eq!(reg.session_count(), 1);
                assert_eq!(reg.find_session(&id).unwrap().name(), "Calm");
            }

            it "rejects sessions beyond capacity" {
                let mut small = Registry::with_id_source(
                    RegistryConfig { max_sessions: 2, max_users: 1 },
                    SequentialIds::new("s"),
                );
                add_session(&mut small, "One", 10.0, "Principiante", GuidedMeditation::default());
                add_session(&mut small, "Two", 10.0, "Principiante", GuidedMeditation::default());

                let third = Session::new(
                    small.ids(),
                    CreateSessionInput::new("Three", "Studio"),
                    GuidedMeditation::default(),
                ).unwrap();
                let err = small.add_session(third).unwrap_err();

                assert_eq!(err, RegistryError::CapacityReached { collection: Collection::Sessions, limit: 2 });
                assert!(!err.is_contract_violation());
                assert_eq!(small.session_count(), 2);
            }
        }

        describe "remove_session" {
            it "returns the removed session" {
                let id = add_session(&mut reg, "Calm", 20.0, "Principiante", GuidedMeditation::default());

                let removed = reg.remove_session(&id).expect("Failed to remove");
                assert_eq!(removed.id(), &id);
                assert!(reg.find_session(&id).is_none());
            }

            it "reports a missing id" {
                assert_eq!(
                    reg.remove_session("nope").unwrap_err(),
                    RegistryError::SessionNotFound("nope".to_string())
                );
            }

            it "leaves instructor references dangling without failing lookups" {
                let leo = add_instructor(&mut reg, "Leo", "leo@example.com");
                let keep = add_session(&mut reg, "Keep", 20.0, "Principiante", YogaSession::default());
                let gone = add_session(&mut reg, "Gone", 20.0, "Principiante", YogaSession::default());
                reg.assign_instructor(&leo, &keep).unwrap();
                reg.assign_instructor(&leo, &gone).unwrap();

                reg.remove_session(&gone).unwrap();

                let teaching = reg.find_user(&leo).unwrap().as_instructor().unwrap().sessions_teaching().len();
                assert_eq!(teaching, 2);
                let taught = reg.sessions_taught_by(&leo).unwrap();
                assert_eq!(names(&taught), vec!["Keep"]);
            }
        }

        describe "all_sessions" {
            it "is a snapshot that the caller can reshape freely" {
                add_session(&mut reg, "A", 10.0, "Principiante", GuidedMeditation::default());
                add_session(&mut reg, "B", 10.0, "Principiante", GuidedMeditation::default());

                let mut snapshot = reg.all_sessions();
                snapshot.clear();

                assert_eq!(reg.all_sessions().len(), 2);
            }
        }

        describe "find_session_mut" {
            it "lets callers mutate through validated setters" {
                let id = add_session(&mut reg, "Flow", 30.0, "Intermedio", YogaSession::default());

                let session = reg.find_session_mut(&id).unwrap();
                assert!(session.set_duration(0.0).is_err());
                assert!(session.as_guided_mut().is_none());
                session.as_yoga_mut().unwrap().add_pose("Tadasana").unwrap();

                let session = reg.find_session(&id).unwrap();
                assert_eq!(session.duration(), 30.0);
                assert_eq!(session.session_type(), SessionType::YogaSession);
                match session.kind() {
                    SessionKind::YogaSession(yoga) => assert_eq!(yoga.poses(), ["Tadasana"]),
                    other => panic!("unexpected kind {:?}", other),
                }
            }
        }
    }

    describe "search and filters" {
        before {
            add_session(&mut reg, "Morning Calm", 5.0, "Principiante", GuidedMeditation::default());
            add_session(&mut reg, "Box Breath", 10.0, "Intermedio", BreathingExercise::default());
            add_session(&mut reg, "Power Flow", 30.0, "Avanzado", YogaSession::default());
            let walk = add_session(&mut reg, "Calm Walk", 25.0, "Principiante", MindfulnessExercise::default());
            add_session(&mut reg, "Long Sit", 60.0, "Avanzado", GuidedMeditation::default());
            reg.set_session_active(&walk, false).unwrap();
        }

        it "searches names case-insensitively" {
            assert_eq!(names(&reg.search_by_name("calm")), vec!["Morning Calm", "Calm Walk"]);
            assert_eq!(names(&reg.search_by_name("FLOW")), vec!["Power Flow"]);
            assert!(reg.search_by_name("zen").is_empty());
        }

        it "filters by type" {
            assert_eq!(
                names(&reg.filter_by_type(SessionType::GuidedMeditation)),
                vec!["Morning Calm", "Long Sit"]
            );
        }

        it "filters by status" {
            assert_eq!(names(&reg.filter_by_status(false)), vec!["Calm Walk"]);
            assert_eq!(reg.filter_by_status(true).len(), 4);
        }

        it "filters by difficulty" {
            assert_eq!(names(&reg.filter_by_difficulty("Avanzado")), vec!["Power Flow", "Long Sit"]);
        }

        it "filters by duration with inclusive bounds in original order" {
            assert_eq!(
                names(&reg.filter_by_duration(10.0, 30.0)),
                vec!["Box Breath", "Power Flow", "Calm Walk"]
            );
        }

        it "composes by sequential filtering" {
            let beginner = reg.filter_by_difficulty("Principiante");
            let active_beginner = query::by_status(&beginner, true);
            let calm = query::by_name(&active_beginner, "calm");

            assert_eq!(names(&calm), vec!["Morning Calm"]);
        }
    }

    describe "stats" {
        it "is all zeros for an empty registry" {
            assert_eq!(reg.stats(), RegistryStats::default());
            let stats = reg.stats();
            assert_eq!(stats.total, 0);
            assert!(stats.by_type.is_empty());
            assert!(stats.by_difficulty.is_empty());
            assert_eq!(stats.total_minutes, 0.0);
            assert_eq!(stats.users, 0);
            assert_eq!(stats.completed_sessions, 0);
        }

        it "totals a single guided meditation" {
            add_session(&mut reg, "Calm", 20.0, "Principiante", GuidedMeditation::default());

            let stats = reg.stats();
            assert_eq!(stats.total_minutes, 20.0);
            assert_eq!(stats.total_calories, 60.0);
        }

        it "groups by type and difficulty" {
            add_session(&mut reg, "A", 10.0, "Principiante", GuidedMeditation::default());
            add_session(&mut reg, "B", 20.0, "Principiante", YogaSession::default());
            let c = add_session(&mut reg, "C", 30.0, "Avanzado", YogaSession::default());
            reg.set_session_active(&c, false).unwrap();
            let ana = add_practitioner(&mut reg, "Ana", "ana@example.com");
            reg.record_completed_session(&ana, &c).unwrap();

            let stats = reg.stats();
            assert_eq!(stats.total, 3);
            assert_eq!(stats.active, 2);
            assert_eq!(stats.inactive, 1);
            assert_eq!(stats.by_type.get("YogaSession"), Some(&2));
            assert_eq!(stats.by_type.get("GuidedMeditation"), Some(&1));
            assert_eq!(stats.by_difficulty.get("Principiante"), Some(&2));
            assert_eq!(stats.by_difficulty.get("Avanzado"), Some(&1));
            assert_eq!(stats.total_minutes, 60.0);
            assert_eq!(stats.total_calories, 30.0 + 100.0 + 150.0);
            assert_eq!(stats.users, 1);
            assert_eq!(stats.completed_sessions, 1);
        }
    }

    describe "users" {
        describe "add_user" {
            it "rejects a duplicate email without growing" {
                add_practitioner(&mut reg, "A", "a@x.com");
                let b = Person::practitioner(
                    reg.ids(),
                    CreatePersonInput::new("B", "A@X.com"),
                    MembershipType::Elite,
                ).unwrap();

                let err = reg.add_user(b).unwrap_err();
                assert_eq!(err, RegistryError::EmailTaken("a@x.com".to_string()));
                assert_eq!(reg.user_count(), 1);
            }

            it "rejects users beyond capacity" {
                let mut small = Registry::with_id_source(
                    RegistryConfig { max_sessions: 1, max_users: 1 },
                    SequentialIds::new("u"),
                );
                add_practitioner(&mut small, "A", "a@x.com");
                let b = Person::practitioner(
                    small.ids(),
                    CreatePersonInput::new("B", "b@x.com"),
                    MembershipType::Basic,
                ).unwrap();

                assert_eq!(
                    small.add_user(b).unwrap_err(),
                    RegistryError::CapacityReached { collection: Collection::Users, limit: 1 }
                );
            }
        }

        describe "change_email" {
            it "refuses an address held by someone else and keeps the old one" {
                let a = add_practitioner(&mut reg, "A", "a@x.com");
                let b = add_practitioner(&mut reg, "B", "b@x.com");

                let err = reg.change_email(&b, "A@x.com").unwrap_err();
                assert_eq!(err, RegistryError::EmailTaken("a@x.com".to_string()));
                assert!(!err.is_contract_violation());

                assert_eq!(reg.find_user(&b).unwrap().email(), "b@x.com");
                assert_eq!(reg.find_user_by_email("a@x.com").unwrap().id(), &a);
                let holders = reg
                    .all_users()
                    .iter()
                    .filter(|p| p.email() == "a@x.com")
                    .count();
                assert_eq!(holders, 1);
            }

            it "accepts a free address and the current one" {
                let a = add_practitioner(&mut reg, "A", "a@x.com");

                reg.change_email(&a, "a@x.com").unwrap();
                reg.change_email(&a, "new@x.com").unwrap();

                assert!(reg.find_user_by_email("a@x.com").is_none());
                assert_eq!(reg.find_user_by_email("NEW@x.com").unwrap().id(), &a);
            }

            it "reports a malformed address as a contract violation" {
                let a = add_practitioner(&mut reg, "A", "a@x.com");

                assert!(reg.change_email(&a, "nope").unwrap_err().is_contract_violation());
                assert_eq!(reg.find_user(&a).unwrap().email(), "a@x.com");
            }
        }

        describe "remove_user" {
            it "removes the person but keeps their completion history" {
                let ana = add_practitioner(&mut reg, "Ana", "ana@example.com");
                let s = add_session(&mut reg, "Calm", 20.0, "Principiante", GuidedMeditation::default());
                reg.record_completed_session(&ana, &s).unwrap();

                reg.remove_user(&ana).unwrap();

                assert!(reg.find_user(&ana).is_none());
                assert!(reg.find_user_by_email("ana@example.com").is_none());
                assert_eq!(reg.completions_for(&ana).len(), 1);
            }
        }
    }

    describe "record_completed_session" {
        it "updates practitioner progress" {
            let p = add_practitioner(&mut reg, "Ana", "ana@example.com");
            let s = add_session(&mut reg, "Calm", 20.0, "Principiante", GuidedMeditation::default());

            let record = reg.record_completed_session(&p, &s).unwrap();
            assert_eq!(record.person_id, p);
            assert_eq!(record.session_id, s);

            let info = reg.find_user(&p).unwrap().info();
            match info.role {
                RoleInfo::Practitioner(progress) => {
                    assert_eq!(progress.sessions_completed, 1);
                    assert_eq!(progress.total_minutes, 20.0);
                    assert_eq!(progress.level, Level::Novice);
                    assert_eq!(progress.favorite_type, Some(SessionType::GuidedMeditation));
                }
                other => panic!("unexpected role {:?}", other),
            }
            assert_eq!(reg.find_user(&p).unwrap().as_practitioner().unwrap().level(), Level::Novice);
        }

        it "logs instructors without touching progress" {
            let leo = add_instructor(&mut reg, "Leo", "leo@example.com");
            let s = add_session(&mut reg, "Calm", 20.0, "Principiante", GuidedMeditation::default());

            reg.record_completed_session(&leo, &s).unwrap();

            assert_eq!(reg.completions().len(), 1);
            assert!(reg.find_user(&leo).unwrap().as_practitioner().is_none());
        }

        it "allows repeated completions" {
            let p = add_practitioner(&mut reg, "Ana", "ana@example.com");
            let s = add_session(&mut reg, "Calm", 20.0, "Principiante", GuidedMeditation::default());

            reg.record_completed_session(&p, &s).unwrap();
            reg.record_completed_session(&p, &s).unwrap();

            assert_eq!(reg.completions_for(&p).len(), 2);
            let practitioner = reg.find_user(&p).unwrap().as_practitioner().unwrap();
            assert_eq!(practitioner.total_minutes(), 40.0);
        }

        it "fails when either id is unknown" {
            let p = add_practitioner(&mut reg, "Ana", "ana@example.com");
            let s = add_session(&mut reg, "Calm", 20.0, "Principiante", GuidedMeditation::default());

            assert_eq!(
                reg.record_completed_session("ghost", &s).unwrap_err(),
                RegistryError::PersonNotFound("ghost".to_string())
            );
            assert_eq!(
                reg.record_completed_session(&p, "ghost").unwrap_err(),
                RegistryError::SessionNotFound("ghost".to_string())
            );
            assert!(reg.completions().is_empty());
        }
    }

    describe "assign_instructor" {
        it "links the instructor and the session" {
            let leo = add_instructor(&mut reg, "Leo", "leo@example.com");
            let s = add_session(&mut reg, "Flow", 45.0, "Avanzado", YogaSession::default());

            reg.assign_instructor(&leo, &s).unwrap();

            assert_eq!(reg.find_session(&s).unwrap().instructor(), "Leo");
            assert_eq!(names(&reg.filter_by_instructor("Leo")), vec!["Flow"]);
            assert_eq!(names(&reg.sessions_taught_by(&leo).unwrap()), vec!["Flow"]);
        }

        it "refuses practitioners as a contract violation" {
            let ana = add_practitioner(&mut reg, "Ana", "ana@example.com");
            let s = add_session(&mut reg, "Flow", 45.0, "Avanzado", YogaSession::default());

            let err = reg.assign_instructor(&ana, &s).unwrap_err();
            assert!(err.is_contract_violation());
            assert_eq!(reg.find_session(&s).unwrap().instructor(), "unassigned");
        }
    }
}
