#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs;
    use storehouse::libs::app::App;
    use storehouse::libs::attendance::Attendance;
    use storehouse::libs::task::{Task, TaskPriority, TaskStatus};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct AppTestContext {
        temp_dir: TempDir,
        app: App,
    }

    impl TestContext for AppTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let app = App::open(temp_dir.path());
            AppTestContext { temp_dir, app }
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    fn due(d: u32) -> NaiveDateTime {
        day(d).and_hms_opt(17, 0, 0).unwrap()
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_attendance_overwrite(ctx: &mut AppTestContext) {
        ctx.app.attendance.mark(Attendance::new("jdoe", day(3), true, "")).unwrap();
        ctx.app.attendance.mark(Attendance::new("jdoe", day(3), false, "Doctor, then home")).unwrap();

        let reopened = App::open(ctx.temp_dir.path());
        let records = reopened.attendance.all();
        assert_eq!(records.len(), 1);
        assert!(!records[0].present);
        assert_eq!(records[0].notes, "Doctor, then home");
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_task_lifecycle_survives_reopen(ctx: &mut AppTestContext) {
        let first = ctx
            .app
            .tasks
            .create(Task::new("Count stock", "Aisle 3", "jdoe", TaskPriority::High, due(14), "admin"))
            .unwrap();
        let second = ctx
            .app
            .tasks
            .create(Task::new("Order paper", "", "amy", TaskPriority::Low, due(20), "admin"))
            .unwrap();
        ctx.app.tasks.set_status(first, TaskStatus::Completed).unwrap();

        let reopened = App::open(ctx.temp_dir.path());
        assert_eq!(reopened.tasks.all(), ctx.app.tasks.all());
        assert_eq!(reopened.tasks.get(first).unwrap().status, TaskStatus::Completed);
        assert_eq!(reopened.tasks.get(second).unwrap().priority, TaskPriority::Low);
        assert_eq!(reopened.tasks.completion_rate(), 50.0);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_missing_task_is_not_found(ctx: &mut AppTestContext) {
        assert!(ctx.app.tasks.set_status(99, TaskStatus::Completed).unwrap_err().is_not_found());
        assert!(ctx.app.tasks.delete(99).unwrap_err().is_not_found());
        assert!(!ctx.temp_dir.path().join("tasks.csv").exists());
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_tasks_file_layout(ctx: &mut AppTestContext) {
        let task = Task::new("Count stock", "", "jdoe", TaskPriority::Medium, due(14), "admin");
        let created = task.created_at();
        ctx.app.tasks.create(task).unwrap();

        let contents = fs::read_to_string(ctx.temp_dir.path().join("tasks.csv")).unwrap();
        let expected = format!(
            "ID,Title,Description,AssignedTo,Status,Priority,DueDate,CreatedBy,CreatedAt\n1,Count stock,,jdoe,Pending,Medium,2025-02-14T17:00:00,admin,{}\n",
            created.format("%Y-%m-%dT%H:%M:%S")
        );
        assert_eq!(contents, expected);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_summary_counts(ctx: &mut AppTestContext) {
        ctx.app.attendance.mark(Attendance::new("jdoe", day(3), true, "")).unwrap();
        ctx.app.attendance.mark(Attendance::new("jdoe", day(4), false, "")).unwrap();
        ctx.app
            .tasks
            .create(Task::new("Count stock", "", "jdoe", TaskPriority::High, due(14), "admin"))
            .unwrap();

        let summary = ctx.app.summary();
        assert_eq!(summary.tasks, 1);
        assert_eq!(summary.tasks_by_status[&TaskStatus::Pending], 1);
        assert_eq!(summary.tasks_by_priority[&TaskPriority::High], 1);
        assert_eq!(summary.attendance_rates["jdoe"], 50.0);
        assert_eq!(summary.locked_users, 0);
    }
}
