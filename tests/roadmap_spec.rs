use speculate2::speculate;
use spiral_core::*;

fn add_milestone(roadmap: &mut Roadmap, family: char, title: &str) -> String {
    roadmap
        .add_milestone(CreateMilestoneInput {
            family: Some(family),
            title: title.to_string(),
            ..CreateMilestoneInput::default()
        })
        .expect("Failed to add milestone")
        .id
        .clone()
}

fn add_task(roadmap: &mut Roadmap, parent: &str, title: &str) -> String {
    roadmap
        .add_task(CreateTaskInput {
            parent_id: parent.to_string(),
            title: title.to_string(),
            ..CreateTaskInput::default()
        })
        .expect("Failed to add task")
        .id
        .clone()
}

speculate! {
    before {
        let storage = MemoryStorage::new();
        let store = RoadmapStore::open_memory(storage.clone());
        let mut roadmap = store.load().expect("Failed to load roadmap");
    }

    describe "milestones" {
        it "numbers milestones per family" {
            assert_eq!(add_milestone(&mut roadmap, 'D', "First"), "D1");
            assert_eq!(add_milestone(&mut roadmap, 'D', "Second"), "D2");
            assert_eq!(add_milestone(&mut roadmap, 'E', "Other family"), "E1");
            assert_eq!(add_milestone(&mut roadmap, 'D', "Third"), "D3");
        }

        it "continues after the highest number and never fills gaps" {
            for id in ["D1", "D2", "D5"] {
                roadmap.add_milestone(CreateMilestoneInput {
                    id: Some(id.to_string()),
                    title: format!("Milestone {id}"),
                    ..CreateMilestoneInput::default()
                }).expect("Failed to add milestone");
            }
            assert_eq!(add_milestone(&mut roadmap, 'D', "Next"), "D6");
        }

        it "defaults new milestones to planned" {
            let id = add_milestone(&mut roadmap, 'D', "First");
            let milestone = roadmap.milestone(&id).expect("Milestone missing");
            assert_eq!(milestone.status(), "planned");
            assert_eq!(milestone.family, "D");
            assert!(!milestone.is_in_cycle());
        }

        it "rejects a duplicate explicit id" {
            add_milestone(&mut roadmap, 'D', "First");
            let err = roadmap.add_milestone(CreateMilestoneInput {
                id: Some("D1".to_string()),
                title: "Again".to_string(),
                ..CreateMilestoneInput::default()
            }).expect_err("Should fail");
            assert!(matches!(err, Error::DuplicateId { kind: "milestone", .. }));
            assert_eq!(roadmap.milestones.len(), 1);
        }

        it "rejects a task-level id for a milestone" {
            let err = roadmap.add_milestone(CreateMilestoneInput {
                id: Some("D1.1".to_string()),
                title: "Wrong level".to_string(),
                ..CreateMilestoneInput::default()
            }).expect_err("Should fail");
            assert!(matches!(err, Error::UnexpectedLevel { expected: Level::Milestone, found: Level::Task, .. }));
        }

        it "rejects an empty title" {
            let err = roadmap.add_milestone(CreateMilestoneInput::default()).expect_err("Should fail");
            assert!(matches!(err, Error::Validation(ValidationError::EmptyMilestoneTitle { .. })));
            assert!(roadmap.is_empty());
        }
    }

    describe "tasks" {
        before {
            let milestone = add_milestone(&mut roadmap, 'D', "Auth");
        }

        it "numbers tasks under their milestone" {
            assert_eq!(add_task(&mut roadmap, &milestone, "Login"), "D1.1");
            assert_eq!(add_task(&mut roadmap, &milestone, "Logout"), "D1.2");
            let other = add_milestone(&mut roadmap, 'D', "Billing");
            assert_eq!(add_task(&mut roadmap, &other, "Invoices"), "D2.1");
        }

        it "numbers subtasks under their task" {
            let task = add_task(&mut roadmap, &milestone, "Login");
            assert_eq!(add_task(&mut roadmap, &task, "Form"), "D1.1.1");
            assert_eq!(add_task(&mut roadmap, &task, "Errors"), "D1.1.2");
            assert_eq!(roadmap.task("D1.1.2").map(|t| t.parent_id.as_str()), Some("D1.1"));
        }

        it "defaults new tasks to planned" {
            let id = add_task(&mut roadmap, &milestone, "Login");
            assert_eq!(roadmap.task(&id).and_then(Task::task_status), Some(TaskStatus::Planned));
        }

        it "rejects a missing parent" {
            let err = roadmap.add_task(CreateTaskInput {
                parent_id: "D7".to_string(),
                title: "Orphan".to_string(),
                ..CreateTaskInput::default()
            }).expect_err("Should fail");
            assert!(matches!(err, Error::InvalidParent { .. }));
        }

        it "rejects children of subtasks" {
            let task = add_task(&mut roadmap, &milestone, "Login");
            let subtask = add_task(&mut roadmap, &task, "Form");
            let err = roadmap.add_task(CreateTaskInput {
                parent_id: subtask,
                title: "Too deep".to_string(),
                ..CreateTaskInput::default()
            }).expect_err("Should fail");
            assert!(matches!(err, Error::InvalidParent { .. }));
        }

        it "rejects an explicit id that does not sit under the parent" {
            add_milestone(&mut roadmap, 'D', "Billing");
            let err = roadmap.add_task(CreateTaskInput {
                id: Some("D2.1".to_string()),
                parent_id: milestone.clone(),
                title: "Misplaced".to_string(),
                ..CreateTaskInput::default()
            }).expect_err("Should fail");
            assert!(matches!(err, Error::InvalidParent { .. }));
        }
    }

    describe "updates" {
        before {
            let milestone = add_milestone(&mut roadmap, 'D', "Auth");
            let task = add_task(&mut roadmap, &milestone, "Login");
        }

        it "applies field=value edits to a milestone" {
            let mut input = UpdateMilestoneInput::default();
            input.set("priority", "critical").expect("Bad edit");
            input.set("cycle-status", "in-cycle").expect("Bad edit");
            roadmap.update_milestone(&milestone, input).expect("Update failed");

            let updated = roadmap.milestone(&milestone).expect("Milestone missing");
            assert_eq!(updated.priority.as_deref(), Some("critical"));
            assert!(updated.is_in_cycle());
        }

        it "clears optional fields with an empty value" {
            let mut input = UpdateTaskInput::default();
            input.set("notes", "check SSO").expect("Bad edit");
            roadmap.update_task(&task, input).expect("Update failed");

            let mut input = UpdateTaskInput::default();
            input.set("notes", "").expect("Bad edit");
            roadmap.update_task(&task, input).expect("Update failed");
            assert!(roadmap.task(&task).and_then(|t| t.notes.as_ref()).is_none());
        }

        it "rejects unknown fields and bad values" {
            let mut input = UpdateTaskInput::default();
            assert!(matches!(input.set("owner", "me"), Err(Error::UnknownField(_))));
            assert!(matches!(input.set("status", "finished"), Err(Error::InvalidValue { field: "status", .. })));
            assert!(input.is_empty());
        }

        it "reports missing items" {
            let err = roadmap.update_task("D1.9", UpdateTaskInput::default()).expect_err("Should fail");
            assert!(matches!(err, Error::NotFound { kind: "task", .. }));
        }
    }

    describe "removal" {
        before {
            let milestone = add_milestone(&mut roadmap, 'D', "Auth");
            let task = add_task(&mut roadmap, &milestone, "Login");
            add_task(&mut roadmap, &task, "Form");
            add_task(&mut roadmap, &milestone, "Logout");
            let keep = add_milestone(&mut roadmap, 'D', "Billing");
            add_task(&mut roadmap, &keep, "Invoices");
        }

        it "removes a milestone with its tasks and subtasks" {
            let removed = roadmap.remove_milestone(&milestone).expect("Remove failed");
            assert_eq!(removed, vec!["D1", "D1.1", "D1.1.1", "D1.2"]);
            assert_eq!(roadmap.tasks.len(), 1);
            store.save(&roadmap).expect("Save failed");
        }

        it "removes a task with its subtasks" {
            let removed = roadmap.remove_task(&task).expect("Remove failed");
            assert_eq!(removed, vec!["D1.1", "D1.1.1"]);
            assert!(roadmap.task("D1.2").is_some());
        }

        it "does not fill gaps left by removals" {
            roadmap.remove_task(&task).expect("Remove failed");
            assert_eq!(add_task(&mut roadmap, &milestone, "Again"), "D1.3");
            roadmap.remove_milestone(&keep).expect("Remove failed");
            assert_eq!(add_milestone(&mut roadmap, 'D', "New"), "D2");
        }
    }

    describe "persistence" {
        it "saves and reloads an edited roadmap" {
            let milestone = add_milestone(&mut roadmap, 'E', "Search");
            add_task(&mut roadmap, &milestone, "Index");
            store.save(&roadmap).expect("Save failed");

            let reloaded = store.load().expect("Load failed");
            assert_eq!(reloaded, roadmap);
            assert_eq!(IdGenerator::new(&reloaded).next_task_id("E1").expect("Generate failed").to_string(), "E1.2");
        }
    }
}
