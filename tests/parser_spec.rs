use planboard::models::{PlanStatus, RequirementStatus, TodoStatus};
use planboard::parsers::frontmatter::{as_bool, as_string, as_string_array, as_u32, split_frontmatter};
use planboard::parsers::roadmap::{parse_phase_range, parse_roadmap, to_milestones};
use planboard::parsers::{config, extract, markdown, plan, requirements, status, summary, todo, verification};
use planboard::models::{MilestoneCategory, MilestoneStatus};
use serde_yaml::Value;
use speculate2::speculate;

speculate! {
    describe "frontmatter" {
        it "splits a YAML header from the body" {
            let fm = split_frontmatter("---\nphase: \"03\"\nplan: 2\n---\n# Title\n\ntext");
            assert_eq!(as_string(fm.data.get("phase"), ""), "03");
            assert_eq!(as_u32(fm.data.get("plan"), 0), 2);
            assert_eq!(fm.body, "# Title\n\ntext");
        }

        it "treats a document without a header as all body" {
            let fm = split_frontmatter("# Just markdown\n\ncontent");
            assert!(fm.data.is_empty());
            assert_eq!(fm.body, "# Just markdown\n\ncontent");
        }

        it "falls back to all body on malformed YAML" {
            let raw = "---\nbad: [unclosed\n---\nbody text";
            let fm = split_frontmatter(raw);
            assert!(fm.data.is_empty());
            assert_eq!(fm.body, raw.trim());
        }

        it "falls back when the header root is not a mapping" {
            let fm = split_frontmatter("---\n- just\n- a list\n---\nbody");
            assert!(fm.data.is_empty());
        }

        describe "coercions" {
            it "coerces scalars to strings" {
                assert_eq!(as_string(Some(&Value::from(42)), ""), "42");
                assert_eq!(as_string(Some(&Value::from(true)), ""), "true");
                assert_eq!(as_string(None, "fallback"), "fallback");
            }

            it "wraps a lone scalar into a single-element list" {
                assert_eq!(as_string_array(Some(&Value::from("one"))), vec!["one"]);
                assert!(as_string_array(None).is_empty());
            }

            it "parses numeric strings" {
                assert_eq!(as_u32(Some(&Value::from("7")), 0), 7);
                assert_eq!(as_u32(Some(&Value::from("not a number")), 3), 3);
            }

            it "reads yes and no as booleans" {
                assert!(as_bool(Some(&Value::from("yes")), false));
                assert!(!as_bool(Some(&Value::from("no")), true));
                assert!(as_bool(None, true));
            }
        }
    }

    describe "extract" {
        it "finds a section up to the next heading at the same level" {
            let content = "## First\naaa\n### Nested\nbbb\n## Second\nccc";
            let section = planboard::parsers::extract::section(content, 2, |t| t == "First").unwrap();
            assert_eq!(section, "aaa\n### Nested\nbbb");
        }

        it "returns None for an absent section" {
            assert!(planboard::parsers::extract::section("## Other\nx", 2, |t| t == "Missing").is_none());
        }

        it "collects bullet items" {
            assert_eq!(
                planboard::parsers::extract::bullets("- one\nprose\n- two"),
                vec!["one", "two"]
            );
        }

        it "skips table header and separator rows" {
            let content = "| Decision | Rationale |\n|---|---|\n| Use regex | No grammar |";
            let rows = planboard::parsers::extract::table_rows(content, "Decision");
            assert_eq!(rows, vec![vec!["Use regex".to_string(), "No grammar".to_string()]]);
        }

        it "extracts tagged sections case-insensitively" {
            let content = "<OBJECTIVE>\nDo the thing\n</OBJECTIVE>";
            assert_eq!(planboard::parsers::extract::tagged_section(content, "objective").unwrap(), "Do the thing");
        }

        it "yields None for an unterminated tag" {
            assert!(planboard::parsers::extract::tagged_section("<objective>\nnever closed", "objective").is_none());
        }

        it "reads key-value lines" {
            assert_eq!(planboard::parsers::extract::line_value("duration: 25 min\nother: x", "duration").unwrap(), "25 min");
            assert!(planboard::parsers::extract::line_value("nothing here", "duration").is_none());
        }
    }

    describe "markdown" {
        it "collects headings with levels" {
            let doc = planboard::parsers::markdown::parse_markdown("# One\n\n## Two\n\ntext", "PROJECT.md", "PROJECT.md");
            assert_eq!(doc.headings.len(), 2);
            assert_eq!(doc.headings[0].level, 1);
            assert_eq!(doc.headings[1].text, "Two");
        }
    }

    describe "config" {
        it "parses a full config" {
            let raw = r#"{
                "mode": "standard",
                "depth": "deep",
                "parallelization": true,
                "workflow": {"research": true, "plan_check": false, "verifier": true},
                "git": {"branching_strategy": "trunk"},
                "created": "2026-01-01"
            }"#;
            let config = planboard::parsers::config::parse_config(raw).unwrap();
            assert_eq!(config.mode, "standard");
            assert_eq!(config.depth, "deep");
            assert!(config.parallelization);
            assert!(config.workflow.research);
            assert!(!config.workflow.plan_check);
            assert_eq!(config.git.branching_strategy, "trunk");
        }

        it "defaults missing fields" {
            let config = planboard::parsers::config::parse_config("{}").unwrap();
            assert_eq!(config.mode, "unknown");
            assert_eq!(config.depth, "standard");
            assert!(!config.parallelization);
        }

        it "yields None only for unparseable JSON" {
            assert!(planboard::parsers::config::parse_config("not json").is_none());
        }
    }

    describe "plan" {
        it "parses header fields and tagged sections" {
            let raw = "---\nphase: \"03\"\nplan: 2\ntype: execute\nwave: 2\nautonomous: true\ndepends_on:\n  - 03-01\nfiles_modified:\n  - src/watcher.rs\nrequirements: [WATCH-01]\nmust_haves:\n  truths:\n    - Events are debounced\n  artifacts:\n    - path: src/watcher.rs\n      provides: debounce loop\n      exports: [watch_planning_dir]\n  key_links:\n    - from: src/watcher.rs\n      to: src/state/mod.rs\n      via: mpsc\n      pattern: batch\n---\n\n<objective>\nDebounce filesystem events\n</objective>\n\n<tasks>\n1. Collect\n2. Flush\n</tasks>\n";
            let plan = planboard::parsers::plan::parse_plan(raw, "03-02-PLAN.md", "phases/03-res/03-02-PLAN.md");

            assert_eq!(plan.phase, "03");
            assert_eq!(plan.plan_number, 2);
            assert_eq!(plan.plan_type, "execute");
            assert_eq!(plan.wave, 2);
            assert!(plan.autonomous);
            assert_eq!(plan.depends_on, vec!["03-01"]);
            assert_eq!(plan.requirements, vec!["WATCH-01"]);
            assert_eq!(plan.must_haves.truths, vec!["Events are debounced"]);
            assert_eq!(plan.must_haves.artifacts[0].exports, vec!["watch_planning_dir"]);
            assert_eq!(plan.must_haves.key_links[0].via, "mpsc");
            assert_eq!(plan.objective.as_deref(), Some("Debounce filesystem events"));
            assert_eq!(plan.tasks.as_deref(), Some("1. Collect\n2. Flush"));
            assert_eq!(plan.status, PlanStatus::Planned);
            assert!(plan.summary.is_none());
        }

        it "leaves only the broken section empty on an unterminated tag" {
            let raw = "---\nphase: \"01\"\nplan: 1\n---\n<objective>\nnever closed\n\n<tasks>\nstill fine\n</tasks>";
            let plan = planboard::parsers::plan::parse_plan(raw, "01-01-PLAN.md", "phases/01-a/01-01-PLAN.md");
            assert!(plan.objective.is_none());
            assert_eq!(plan.tasks.as_deref(), Some("still fine"));
        }

        it "falls back to execution_context for the context section" {
            let raw = "---\nphase: \"01\"\nplan: 1\n---\n<execution_context>\nbackground\n</execution_context>";
            let plan = planboard::parsers::plan::parse_plan(raw, "01-01-PLAN.md", "phases/01-a/01-01-PLAN.md");
            assert_eq!(plan.context.as_deref(), Some("background"));
        }

        it "applies defaults for a bare document" {
            let plan = planboard::parsers::plan::parse_plan("just prose", "x-PLAN.md", "phases/01-a/x-PLAN.md");
            assert_eq!(plan.plan_type, "execute");
            assert_eq!(plan.wave, 1);
            assert!(!plan.autonomous);
            assert_eq!(plan.plan_number, 0);
        }

        it "parses identical text into identical records" {
            let raw = "---\nphase: \"03\"\nplan: 2\nrequirements: [WATCH-01]\n---\n\n<objective>\nDebounce filesystem events\n</objective>\n\n<tasks>\n1. Collect\n</tasks>\n";
            let first = planboard::parsers::plan::parse_plan(raw, "03-02-PLAN.md", "phases/03-res/03-02-PLAN.md");
            let second = planboard::parsers::plan::parse_plan(raw, "03-02-PLAN.md", "phases/03-res/03-02-PLAN.md");
            assert_eq!(
                serde_json::to_value(&first).unwrap(),
                serde_json::to_value(&second).unwrap()
            );
        }
    }

    describe "summary" {
        it "reads frontmatter metadata, one-liner, file lists and decisions" {
            let raw = "---\nphase: \"03\"\nplan: 2\nsubsystem: watcher\ntags: [fs, debounce]\n---\n\n**One-liner:** Debounced watcher batches\nduration: 25 min\n\n## What Changed\n\n### Created\n\n- src/watcher.rs\n\n### Modified\n\n- src/state/update.rs\n\n## Decisions\n\n| Decision | Rationale |\n|----------|-----------|\n| Swap snapshots | Readers never block |\n";
            let summary = planboard::parsers::summary::parse_summary(raw);

            assert_eq!(summary.phase, "03");
            assert_eq!(summary.plan, 2);
            assert_eq!(summary.subsystem.as_deref(), Some("watcher"));
            assert_eq!(summary.tags, vec!["fs", "debounce"]);
            assert_eq!(summary.one_liner, "Debounced watcher batches");
            assert_eq!(summary.duration, "25 min");
            assert_eq!(summary.status, "complete");
            assert_eq!(summary.files_created, vec!["src/watcher.rs"]);
            assert_eq!(summary.files_modified, vec!["src/state/update.rs"]);
            assert_eq!(summary.decisions.len(), 1);
            assert_eq!(summary.decisions[0].decision, "Swap snapshots");
            assert_eq!(summary.decisions[0].rationale, "Readers never block");
        }

        it "falls back to inline key-value metadata" {
            let raw = "phase: \"04\"\nplan: 1\nstatus: partial\nstarted: 2026-02-20\n\nbody";
            let summary = planboard::parsers::summary::parse_summary(raw);
            assert_eq!(summary.plan, 1);
            assert_eq!(summary.status, "partial");
            assert_eq!(summary.started, "2026-02-20");
        }

        it "accepts the Decisions Made heading variant" {
            let raw = "## Decisions Made\n\n| Decision | Rationale |\n|---|---|\n| A | B |";
            let summary = planboard::parsers::summary::parse_summary(raw);
            assert_eq!(summary.decisions.len(), 1);
        }

        it "parses identical text into identical records" {
            let raw = "---\nphase: \"03\"\nplan: 2\ntags: [fs]\n---\n\n**One-liner:** Debounced watcher batches\n\n## Decisions\n\n| Decision | Rationale |\n|---|---|\n| Swap snapshots | Readers never block |\n";
            assert_eq!(
                serde_json::to_value(planboard::parsers::summary::parse_summary(raw)).unwrap(),
                serde_json::to_value(planboard::parsers::summary::parse_summary(raw)).unwrap()
            );
        }
    }

    describe "verification" {
        it "parses score, status and the human verification table" {
            let raw = "---\nphase: \"04\"\nverified: 2026-02-21\nstatus: passed\nscore: 9/10\n---\n\n**Re-verification:** Yes\n\n### Human Verification\n\n| Test | Expected | Why human |\n|------|----------|-----------|\n| Save in editor | one rebuild | timing |\n\n## Goal Achievement\n\nWatcher survives rename storms.";
            let v = planboard::parsers::verification::parse_verification(raw);

            assert_eq!(v.phase, "04");
            assert_eq!(v.status, "passed");
            assert_eq!(v.score, "9/10");
            assert_eq!(v.score_num, 9);
            assert_eq!(v.score_total, 10);
            assert!(v.re_verification);
            assert_eq!(v.human_verification.len(), 1);
            assert_eq!(v.human_verification[0].test, "Save in editor");
            assert_eq!(v.goal_achievement, "Watcher survives rename storms.");
        }

        it "defaults everything on an empty document" {
            let v = planboard::parsers::verification::parse_verification("");
            assert_eq!(v.status, "unknown");
            assert_eq!(v.score, "0/0");
            assert_eq!((v.score_num, v.score_total), (0, 0));
            assert!(!v.re_verification);
            assert!(v.human_verification.is_empty());
        }
    }

    describe "todo" {
        it "takes date and slug from the filename" {
            let raw = "---\ntitle: Fix debounce flakiness\narea: watcher\nfiles:\n  - src/watcher.rs\n---\n\n## Problem\n\nBatches fire twice.\n\n## Solution\n\nReset the deadline on every event.";
            let t = planboard::parsers::todo::parse_todo(raw, "2026-02-18-fix-debounce.md", TodoStatus::Pending);

            assert_eq!(t.date, "2026-02-18");
            assert_eq!(t.slug, "fix-debounce");
            assert_eq!(t.title, "Fix debounce flakiness");
            assert_eq!(t.area, "watcher");
            assert_eq!(t.files, vec!["src/watcher.rs"]);
            assert_eq!(t.status, TodoStatus::Pending);
            assert_eq!(t.problem, "Batches fire twice.");
            assert_eq!(t.solution, "Reset the deadline on every event.");
        }

        it "falls back to the created field for an undated filename" {
            let raw = "---\ntitle: X\ncreated: 2026-02-01T10:00:00Z\n---\nbody";
            let t = planboard::parsers::todo::parse_todo(raw, "notes.md", TodoStatus::Done);
            assert_eq!(t.date, "2026-02-01");
            assert_eq!(t.slug, "notes");
        }
    }

    describe "requirements" {
        it "groups checkbox entries under their section" {
            let raw = "# Requirements: Planboard v1.0\n\n## Functional\n\n### Watching\n\n- [x] **WATCH-01**: Debounced rebuilds\n- [ ] **WATCH-02**: Rename handling\n\n## Future Requirements\n\n- **SCALE-01**: Multi-project serving\n";
            let reqs = planboard::parsers::requirements::parse_requirements(raw);

            assert_eq!(reqs.len(), 3);
            assert_eq!(reqs[0].id, "WATCH-01");
            assert_eq!(reqs[0].status, RequirementStatus::Complete);
            assert_eq!(reqs[0].section, "Watching");
            assert_eq!(reqs[0].milestone, "v1.0");
            assert_eq!(reqs[1].status, RequirementStatus::Pending);
            assert_eq!(reqs[2].id, "SCALE-01");
            assert_eq!(reqs[2].milestone, "future");
        }

        it "returns an empty list for a document without entries" {
            assert!(planboard::parsers::requirements::parse_requirements("# Requirements\n\nprose only").is_empty());
        }
    }

    describe "status" {
        it "parses position, progress, velocity and metrics" {
            let raw = "# Project State\n\nPhase: 4 of 9 (Watcher resilience)\nStatus: In progress\nLast activity: 2026-02-20\nProgress: v1.1 [#####-----] 50%\n\n## Velocity\n\nTotal plans completed: 12\nAverage duration: 34 min\nTotal execution time: 410 min\n\n| Phase | Plans | Total | Avg |\n|-------|-------|-------|-----|\n| 01-parsing | 4 | 120 min | 30 min |\n\n### Decisions\n\n- Keep parsers infallible\n\n### Blockers/Concerns\n\nNone\n\n## Session Continuity\n\nLast session: 2026-02-20\nStopped at: Finished watcher debounce\nrework\n\nNext: verify batching\n";
            let s = planboard::parsers::status::parse_status(raw);

            assert_eq!(s.current_phase, 4);
            assert_eq!(s.total_phases, 9);
            assert_eq!(s.phase_name, "Watcher resilience");
            assert_eq!(s.status, "In progress");
            assert_eq!(s.milestone_name, "v1.1");
            assert_eq!(s.progress_percent, 50);
            assert_eq!(s.velocity.total_plans, 12);
            assert_eq!(s.velocity.avg_duration, 34);
            assert_eq!(s.velocity.total_duration, 410);
            assert_eq!(s.phase_metrics.len(), 1);
            assert_eq!(s.phase_metrics[0].phase, "01-parsing");
            assert_eq!(s.phase_metrics[0].total_minutes, 120);
            assert_eq!(s.decisions, vec!["Keep parsers infallible"]);
            assert!(s.blockers.is_empty());
            assert_eq!(s.session_continuity.last_session, "2026-02-20");
            assert_eq!(s.session_continuity.stopped_at, "Finished watcher debounce\nrework");
        }

        it "keeps real blockers" {
            let raw = "### Blockers/Concerns\n\n- CI flaking on macOS\n";
            let s = planboard::parsers::status::parse_status(raw);
            assert_eq!(s.blockers, vec!["CI flaking on macOS"]);
        }

        it "defaults everything on an empty document" {
            let s = planboard::parsers::status::parse_status("");
            assert_eq!(s.current_phase, 0);
            assert!(s.milestone_name.is_empty());
            assert!(s.phase_metrics.is_empty());
        }
    }

    describe "roadmap" {
        describe "phase ranges" {
            it "parses ranges and single numbers" {
                assert_eq!(parse_phase_range("Phases 1-3"), Some((1, 3)));
                assert_eq!(parse_phase_range("4"), Some((4, 4)));
                assert_eq!(parse_phase_range("40\u{2013}45"), Some((40, 45)));
                assert_eq!(parse_phase_range("TBD"), None);
            }
        }

        it "parses milestones under category headings with statuses" {
            let raw = "# Roadmap\n\n## Milestones\n\n### Shipped\n\n- [x] **v1.0 Core** - Phases 1-3 (shipped 2026-01-10)\n\n### Go-Live Gate\n\n- [ ] **v1.1 Hardening** - Phases 4-5\n\n### Phase 4: Watcher resilience\n**Goal**: Survive editor rename storms\n- [ ] 04-01-PLAN.md -- Debounce rework\n- [ ] 04-02-PLAN.md\n\n### Post-Launch\n\n- [ ] **v2.0 Scale** - Phases 6-9\n";
            let roadmap = parse_roadmap(raw);

            assert_eq!(roadmap.len(), 3);
            assert_eq!(roadmap[0].version, "v1.0");
            assert_eq!(roadmap[0].name, "Core");
            assert_eq!(roadmap[0].phase_range, "1-3");
            assert_eq!(roadmap[0].status, MilestoneStatus::Shipped);
            assert_eq!(roadmap[0].category, MilestoneCategory::Shipped);
            assert_eq!(roadmap[0].completed.as_deref(), Some("2026-01-10"));

            assert_eq!(roadmap[1].version, "v1.1");
            assert_eq!(roadmap[1].status, MilestoneStatus::InProgress);
            assert!(roadmap[1].completed.is_none());

            assert_eq!(roadmap[2].status, MilestoneStatus::Planned);
            assert_eq!(roadmap[2].category, MilestoneCategory::PostLaunch);
        }

        it "attaches top-level phase blocks to the first matching range" {
            let raw = "### Go-Live Gate\n\n- [ ] **v1.1 Hardening** - Phases 4-5\n\n### Phase 4: Watcher resilience\n**Goal**: Survive editor rename storms\n- [ ] 04-01-PLAN.md -- Debounce rework\n- [ ] 04-02-PLAN.md\n";
            let roadmap = parse_roadmap(raw);

            assert_eq!(roadmap.len(), 1);
            assert_eq!(roadmap[0].phases.len(), 1);
            let stub = &roadmap[0].phases[0];
            assert_eq!(stub.number, "4");
            assert_eq!(stub.slug, "watcher-resilience");
            assert_eq!(stub.goal, "Survive editor rename storms");
            assert_eq!(stub.plan_count, 2);
            assert_eq!(stub.plan_names[0], "Debounce rework");
            assert_eq!(stub.plan_names[1], "04-02-PLAN.md");
        }

        it "attaches details-nested phases to the named milestone" {
            let raw = "### Shipped\n\n- [x] **v1.0 MVP** - Phases 1-2 (2026-01-05)\n\n<details>\n<summary>v1.0 MVP (Phases 1-2)</summary>\n\n### Phase 1: Parsing\n**Goal**: Read the planning tree\n- [x] 01-01-PLAN.md -- Frontmatter\n\n### Phase 2: Serving\n\n---\ntrailing notes\n</details>\n";
            let roadmap = parse_roadmap(raw);

            assert_eq!(roadmap.len(), 1);
            assert_eq!(roadmap[0].phases.len(), 2);
            assert_eq!(roadmap[0].phases[0].number, "1");
            assert_eq!(roadmap[0].phases[0].goal, "Read the planning tree");
            assert_eq!(roadmap[0].phases[0].plan_count, 1);
            // The rule after Phase 2 cuts its body off.
            assert_eq!(roadmap[0].phases[1].plan_count, 0);

            let milestones = to_milestones(&roadmap);
            assert_eq!(milestones[0].plan_count, 1);
            assert!(milestones[0].phases.is_empty());
        }

        it "handles an empty document" {
            assert!(parse_roadmap("").is_empty());
        }
    }
}
