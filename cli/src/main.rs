use clap::{Parser, Subcommand};
use lingo::model::entity::{
    Course, CourseCreate, Lesson, LessonCreate, Module, ModuleCreate, UserEntity,
    UserEntityCreateUpdate,
};
use lingo::model::{CrudRepository, DbConnection, ModelManager};
use lingo::web::AuthenticatedUser;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the learning DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a user account
    Add {
        username: String,
        password: String,
        /// Give the new account the admin role
        #[arg(long)]
        admin: bool,
    },
    /// List user accounts
    List,
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        title: String,
        #[arg(default_value = "")]
        description: String,
        #[arg(long)]
        order: Option<i32>,
    },
    List,
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        course_id: Uuid,
        title: String,
        #[arg(default_value = "")]
        description: String,
        #[arg(long)]
        order: Option<i32>,
    },
    List,
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        module_id: Uuid,
        title: String,
        #[arg(default_value = "")]
        content: String,
        /// Base experience award for completing this lesson
        #[arg(long)]
        xp: Option<i32>,
        #[arg(long)]
        order: Option<i32>,
    },
    List,
    Delete {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let database_uri = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set (e.g. in .env) to run the seeding CLI");
    let db = DbConnection::connect(&database_uri).expect("Unable to connect to the database");
    let mm = ModelManager::new(db);
    let actor = AuthenticatedUser::admin();

    match cli.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                username,
                password,
                admin,
            } => {
                let hash = lingo::auth::hash_password(&password).expect("Unable to hash password");
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        username,
                        password_hash: hash,
                    },
                )
                .await
                .expect("Unable to create user");

                if admin {
                    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
                        .bind(user.id())
                        .execute(mm.executor())
                        .await
                        .expect("Unable to promote user to admin");
                }

                println!("created user {} ({})", user.username(), user.id());
            }
            UserCommands::List => {
                let users = UserEntity::list(&mm, &actor, 100, 0)
                    .await
                    .expect("Unable to list users");
                for user in users {
                    println!("{}  {}  {}", user.id(), user.username(), user.role());
                }
            }
        },
        Commands::Course { action } => match action {
            CourseCommands::Add {
                title,
                description,
                order,
            } => {
                let course = Course::create(
                    &mm,
                    &actor,
                    CourseCreate {
                        title,
                        description,
                        order_index: order,
                    },
                )
                .await
                .expect("Unable to create course");
                println!("created course {} ({})", course.title(), course.id());
            }
            CourseCommands::List => {
                let courses = Course::all(&mm, &actor).await.expect("Unable to list courses");
                for course in courses {
                    println!("{}  {}", course.id(), course.title());
                }
            }
            CourseCommands::Delete { id } => {
                let course = Course::find_by_id(&mm, &actor, id)
                    .await
                    .expect("Unable to fetch course")
                    .expect("Course not found");
                course.delete(&mm, &actor).await.expect("Unable to delete course");
                println!("deleted course {id}");
            }
        },
        Commands::Module { action } => match action {
            ModuleCommands::Add {
                course_id,
                title,
                description,
                order,
            } => {
                let module = Module::create(
                    &mm,
                    &actor,
                    ModuleCreate {
                        course_id,
                        title,
                        description,
                        order_index: order,
                    },
                )
                .await
                .expect("Unable to create module");
                println!("created module {} ({})", module.title(), module.id());
            }
            ModuleCommands::List => {
                let modules = Module::list(&mm, &actor, 100, 0)
                    .await
                    .expect("Unable to list modules");
                for module in modules {
                    println!("{}  {}  course={}", module.id(), module.title(), module.course_id());
                }
            }
            ModuleCommands::Delete { id } => {
                let module = Module::find_by_id(&mm, &actor, id)
                    .await
                    .expect("Unable to fetch module")
                    .expect("Module not found");
                module.delete(&mm, &actor).await.expect("Unable to delete module");
                println!("deleted module {id}");
            }
        },
        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module_id,
                title,
                content,
                xp,
                order,
            } => {
                let lesson = Lesson::create(
                    &mm,
                    &actor,
                    LessonCreate {
                        module_id,
                        title,
                        content,
                        experience_points: xp,
                        order_index: order,
                    },
                )
                .await
                .expect("Unable to create lesson");
                println!(
                    "created lesson {} ({}) worth {} xp",
                    lesson.title(),
                    lesson.id(),
                    lesson.experience_points()
                );
            }
            LessonCommands::List => {
                let lessons = Lesson::list(&mm, &actor, 100, 0)
                    .await
                    .expect("Unable to list lessons");
                for lesson in lessons {
                    println!(
                        "{}  {}  module={}  xp={}",
                        lesson.id(),
                        lesson.title(),
                        lesson.module_id(),
                        lesson.experience_points()
                    );
                }
            }
            LessonCommands::Delete { id } => {
                let lesson = Lesson::find_by_id(&mm, &actor, id)
                    .await
                    .expect("Unable to fetch lesson")
                    .expect("Lesson not found");
                lesson.delete(&mm, &actor).await.expect("Unable to delete lesson");
                println!("deleted lesson {id}");
            }
        },
    }
}
