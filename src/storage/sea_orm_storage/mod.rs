//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod lessons;
mod revenue;
mod slots;
mod songs;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, TutorHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TutorHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库不支持 WAL，且每个连接都是独立的库
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { pool_size })
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(if in_memory {
                None
            } else {
                Some(Duration::from_secs(300))
            })
            .max_lifetime(if in_memory {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connect_with(opt)
            .await
            .map_err(|e| TutorHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TutorHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TutorHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    lessons::{
        entities::Lesson,
        requests::{LessonListQuery, LessonRangeQuery, NewLesson, UpdateLessonRequest},
        responses::LessonListResponse,
    },
    revenue::{
        entities::{RevenueTransaction, TransactionStatus},
        requests::{NewTransaction, TransactionListQuery},
        responses::TransactionListResponse,
    },
    slots::{
        entities::{TimeRange, TutorSlot},
        requests::SlotEdit,
        responses::SlotEditOutcome,
    },
    songs::{
        entities::Song,
        requests::{CreateSongRequest, SongListQuery, UpdateSongRequest},
        responses::SongListResponse,
    },
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionReview},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_course(&self, tutor_id: i64, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(tutor_id, course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    // 曲谱模块
    async fn create_song(&self, created_by: i64, song: CreateSongRequest) -> Result<Song> {
        self.create_song_impl(created_by, song).await
    }

    async fn get_song_by_id(&self, song_id: i64) -> Result<Option<Song>> {
        self.get_song_by_id_impl(song_id).await
    }

    async fn list_songs_with_pagination(&self, query: SongListQuery) -> Result<SongListResponse> {
        self.list_songs_with_pagination_impl(query).await
    }

    async fn update_song(&self, song_id: i64, update: UpdateSongRequest) -> Result<Option<Song>> {
        self.update_song_impl(song_id, update).await
    }

    async fn delete_song(&self, song_id: i64) -> Result<bool> {
        self.delete_song_impl(song_id).await
    }

    // 课时模块
    async fn create_lesson(&self, lesson: NewLesson) -> Result<Lesson> {
        self.create_lesson_impl(lesson).await
    }

    async fn get_lesson_by_id(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        self.get_lesson_by_id_impl(lesson_id).await
    }

    async fn list_lessons_with_pagination(
        &self,
        query: LessonListQuery,
    ) -> Result<LessonListResponse> {
        self.list_lessons_with_pagination_impl(query).await
    }

    async fn list_lessons_in_range(&self, query: LessonRangeQuery) -> Result<Vec<Lesson>> {
        self.list_lessons_in_range_impl(query).await
    }

    async fn update_lesson(
        &self,
        lesson_id: i64,
        update: UpdateLessonRequest,
    ) -> Result<Option<Lesson>> {
        self.update_lesson_impl(lesson_id, update).await
    }

    async fn cancel_lesson(
        &self,
        lesson_id: i64,
        cancelled_by: i64,
        reason: Option<String>,
    ) -> Result<bool> {
        self.cancel_lesson_impl(lesson_id, cancelled_by, reason)
            .await
    }

    async fn complete_lesson(
        &self,
        lesson_id: i64,
        payment: Option<NewTransaction>,
    ) -> Result<bool> {
        self.complete_lesson_impl(lesson_id, payment).await
    }

    async fn delete_lesson(&self, lesson_id: i64) -> Result<bool> {
        self.delete_lesson_impl(lesson_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        tutor_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(tutor_id, assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_latest_submission(&self, assignment_id: i64) -> Result<Option<Submission>> {
        self.get_latest_submission_impl(assignment_id).await
    }

    async fn list_submission_history(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.list_submission_history_impl(assignment_id).await
    }

    async fn review_submission(&self, review: SubmissionReview) -> Result<Option<Submission>> {
        self.review_submission_impl(review).await
    }

    // 收入模块
    async fn create_transaction(&self, transaction: NewTransaction) -> Result<RevenueTransaction> {
        self.create_transaction_impl(transaction).await
    }

    async fn get_transaction_by_id(
        &self,
        transaction_id: i64,
    ) -> Result<Option<RevenueTransaction>> {
        self.get_transaction_by_id_impl(transaction_id).await
    }

    async fn list_transactions_with_pagination(
        &self,
        query: TransactionListQuery,
    ) -> Result<TransactionListResponse> {
        self.list_transactions_with_pagination_impl(query).await
    }

    async fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> Result<Vec<RevenueTransaction>> {
        self.list_transactions_impl(query).await
    }

    async fn update_transaction_status(
        &self,
        transaction_id: i64,
        from: TransactionStatus,
        to: TransactionStatus,
        note: Option<String>,
    ) -> Result<bool> {
        self.update_transaction_status_impl(transaction_id, from, to, note)
            .await
    }

    // 时段模块
    async fn list_tutor_slots(&self, tutor_id: i64, window: TimeRange) -> Result<Vec<TutorSlot>> {
        self.list_tutor_slots_impl(tutor_id, window).await
    }

    async fn apply_slot_edit(&self, tutor_id: i64, edit: SlotEdit) -> Result<SlotEditOutcome> {
        self.apply_slot_edit_impl(tutor_id, edit).await
    }
}
