mod user;
pub use user::{UserEntity, UserEntityCreateUpdate};

mod course;
pub use course::{Course, CourseCreate};

mod module;
pub use module::{Module, ModuleCreate, ModuleWithLessonsRow};

mod lesson;
pub use lesson::{Lesson, LessonCreate, LessonWithStatusRow};

mod lesson_completion;
pub use lesson_completion::{LessonCompletion, LessonCompletionCreate};

mod user_progress;
pub use user_progress::UserProgress;
