//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::lessons::{ActiveModel as LessonActiveModel, Entity as Lessons, Model as LessonModel};
pub use super::revenue_transactions::{
    ActiveModel as RevenueTransactionActiveModel, Entity as RevenueTransactions,
    Model as RevenueTransactionModel,
};
pub use super::songs::{ActiveModel as SongActiveModel, Entity as Songs, Model as SongModel};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::tutor_slots::{
    ActiveModel as TutorSlotActiveModel, Entity as TutorSlots, Model as TutorSlotModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
