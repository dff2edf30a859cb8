//! services/portal/src/bin/portal.rs
//!
//! Command-line front end: each subcommand mounts one view and renders it as text.

use std::path::PathBuf;
use std::sync::Arc;

use alumnos_core::domain::UploadFile;
use alumnos_core::questionnaire::KindTag;
use alumnos_core::validation::mime_for_file_name;
use clap::{Parser, Subcommand};
use portal_lib::{
    adapters::{FileSessionStore, HttpApi},
    config::Config,
    error::PortalError,
    views::{
        chat::ComposeView,
        classes::ClassesView,
        login::LoginView,
        messages::MessagesView,
        notifications::NotificationsView,
        pages::{self, SignedInPage},
        password::PasswordRecoveryView,
        questionnaires::{QuestionnaireBuilder, QuestionnaireTaker, ResponsesView},
        registration::RegistrationView,
        router::{render_breadcrumbs, Route},
        submission::SubmissionView,
        task_board::{status_badge, TaskBoardView, TaskDraft},
        task_list::TaskListView,
        AppState, SessionContext, ViewError,
    },
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "portal", about = "School portal client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the page and breadcrumbs for a client path.
    Route { path: String },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD")]
        password: String,
    },
    Logout,
    /// Create an account; asks the CAPTCHA on stdin.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD")]
        password: String,
    },
    /// Mail a password recovery code.
    SendCode {
        #[arg(long)]
        email: String,
    },
    ResetPassword {
        #[arg(long)]
        code: String,
        #[arg(long)]
        new_password: String,
    },
    Dashboard,
    Classes,
    CreateClass {
        #[arg(long)]
        name: String,
        /// Student e-mail; repeat for each student.
        #[arg(long = "student", required = true)]
        students: Vec<String>,
    },
    /// Tasks of a class, as a student sees them.
    Tasks { class_id: String },
    /// Every task of a class I teach.
    Board { class_id: String },
    CreateTask {
        class_id: String,
        #[arg(long)]
        instructions: String,
        /// Due day, YYYY-MM-DD.
        #[arg(long)]
        due: String,
    },
    Grade {
        class_id: String,
        task_id: String,
        grade: String,
    },
    Download {
        class_id: String,
        task_id: String,
    },
    Task { task_id: String },
    Submit { task_id: String, file: PathBuf },
    Messages {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Open a chat: prints refreshes, sends each stdin line. Ctrl-C leaves.
    Chat { email: String },
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        content: String,
    },
    Notifications {
        #[arg(long, default_value = "")]
        search: String,
    },
    CreateQuestionnaire {
        #[arg(long)]
        title: String,
        #[arg(long)]
        instructions: String,
        /// Due day, YYYY-MM-DD.
        #[arg(long)]
        due: String,
        #[arg(long, default_value_t = 10)]
        show: u32,
        #[arg(long)]
        class_id: Option<String>,
        /// `open|text|answer`, `boolean|text|true` or `multiple|text|a,b,c|answer`.
        #[arg(long = "question")]
        questions: Vec<String>,
    },
    /// Answer a questionnaire; asks each question on stdin.
    TakeQuestionnaire { questionnaire_id: String },
    Responses { questionnaire_id: String },
}

#[tokio::main]
async fn main() -> Result<(), PortalError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api = %config.api_base_url, "Configuration loaded.");

    // --- 2. Initialize Adapters & Shared State ---
    let api = HttpApi::new(&config.api_base_url, config.request_timeout)?;
    let session = SessionContext::new(Arc::new(FileSessionStore::new(&config.session_path)));
    let state = AppState::with_http(config, api);

    // --- 3. Run the Command ---
    let cli = Cli::parse();
    match run(cli.command, state, session).await {
        Err(PortalError::View(ViewError::Redirect(route))) => {
            eprintln!("Not signed in. Run `portal login` first ({}).", route);
            std::process::exit(2);
        }
        other => other,
    }
}

async fn run(command: Command, state: AppState, session: SessionContext) -> Result<(), PortalError> {
    match command {
        Command::Route { path } => {
            let route = Route::parse(&path);
            println!("{}", render_breadcrumbs(&path));
            let page = match &route {
                Route::Home => Some(pages::home()),
                Route::Information => Some(pages::information()),
                Route::ServerError => Some(pages::server_error()),
                Route::NotFound(path) => Some(pages::not_found(path)),
                _ => None,
            };
            match page {
                Some(page) => {
                    println!("{}", page.title);
                    for link in page.links {
                        println!("  {} -> {}", link.label, link.route);
                    }
                }
                None if route.requires_session() && !session.is_active() => {
                    return Err(ViewError::Redirect(Route::Login).into());
                }
                None => println!("{:?}", route),
            }
        }
        Command::Login { email, password } => {
            let mut view = LoginView::mount(state, session);
            view.email = email;
            view.password = password;
            let next = report(view.submit().await, &view.error)?;
            println!("Signed in. Next: {}", next);
        }
        Command::Logout => {
            let mut view = LoginView::mount(state, session);
            let next = view.logout();
            println!("Signed out. Next: {}", next);
        }
        Command::Register { name, email, password } => {
            let mut view = RegistrationView::mount(state);
            view.form.name = name;
            view.form.email = email;
            view.form.password = password;
            view.captcha_answer = prompt(&mut stdin_lines(), &view.captcha.question()).await?;
            let next = report(view.submit().await, &view.error)?;
            println!("{}", view.notice.as_deref().unwrap_or_default());
            println!("Next: {}", next);
        }
        Command::SendCode { email } => {
            let mut view = PasswordRecoveryView::mount(state);
            view.email = email;
            report(view.send_code().await, &view.error)?;
            println!("{}", view.notice.as_deref().unwrap_or_default());
        }
        Command::ResetPassword { code, new_password } => {
            let mut view = PasswordRecoveryView::mount(state);
            view.code = code;
            view.new_password = new_password;
            report(view.reset_password().await, &view.error)?;
            println!("{}", view.notice.as_deref().unwrap_or_default());
        }
        Command::Dashboard => {
            let page = SignedInPage::dashboard(session)?;
            println!("{} ({})", page.title, page.user.email);
            for link in page.sidebar.iter().chain(&page.header) {
                println!("  {} -> {}", link.label, link.route);
            }
        }
        Command::Classes => {
            let view = ClassesView::mount(state, &session).await?;
            print_error(&view.error);
            println!("Created by me:");
            for class in &view.classes.created {
                println!("  [{}] {} ({} students) -> {}", class.id, class.name, class.students.len(), view.open_class(&class.id));
            }
            println!("Joined:");
            for class in &view.classes.joined {
                println!("  [{}] {} by {} -> {}", class.id, class.name, class.creator_name, view.open_class(&class.id));
            }
        }
        Command::CreateClass { name, students } => {
            let mut view = ClassesView::mount(state, &session).await?;
            view.open_modal();
            if let Some(draft) = view.draft.as_mut() {
                draft.name = name;
            }
            for email in students {
                if let Some(draft) = view.draft.as_mut() {
                    draft.student_input = email;
                }
                report(view.add_student(), &view.error)?;
            }
            report(view.create_class().await, &view.error)?;
            println!("Class created. You now teach {} classes.", view.classes.created.len());
        }
        Command::Tasks { class_id } => {
            let view = TaskListView::mount(state, &session, &class_id).await?;
            print_error(&view.error);
            for task in &view.tasks {
                println!(
                    "  [{}] {} due {} {}",
                    task.id,
                    task.instructions,
                    task.due_date.with_timezone(&chrono::Local).format("%Y-%m-%d"),
                    status_badge(task)
                );
            }
            if let Some(route) = view.manage_tasks() {
                println!("Manage: {}", route);
            }
        }
        Command::Board { class_id } => {
            let view = TaskBoardView::mount(state, &session, &class_id).await?;
            print_error(&view.error);
            println!("{}", view.class_name);
            for task in &view.tasks {
                let grade = task.grade.map(|g| format!(" {}/10", g)).unwrap_or_default();
                println!("  [{}] {} ({}) {}{}", task.id, task.instructions, task.student_email, status_badge(task), grade);
            }
        }
        Command::CreateTask { class_id, instructions, due } => {
            let mut view = TaskBoardView::mount(state, &session, &class_id).await?;
            view.draft = Some(TaskDraft { instructions, due_date: due });
            report(view.create_task().await, &view.error)?;
            println!("{} tasks in the class.", view.tasks.len());
        }
        Command::Grade { class_id, task_id, grade } => {
            let mut view = TaskBoardView::mount(state, &session, &class_id).await?;
            report(view.grade(&task_id, &grade).await, &view.error)?;
            println!("{}", view.notice.as_deref().unwrap_or_default());
        }
        Command::Download { class_id, task_id } => {
            let mut view = TaskBoardView::mount(state, &session, &class_id).await?;
            let path = report(view.download(&task_id).await, &view.error)?;
            println!("Saved {}", path.display());
        }
        Command::Task { task_id } => {
            let view = SubmissionView::mount(state, &session, &task_id).await?;
            print_error(&view.error);
            if let Some(task) = &view.task {
                println!("{}", task.instructions);
                println!("Status: {}", view.status_label().unwrap_or_default());
                if let Some(name) = &view.file_name {
                    println!("Submitted file: {}", name);
                }
                println!("Upload enabled: {}", view.upload_enabled());
            }
        }
        Command::Submit { task_id, file } => {
            let mut view = SubmissionView::mount(state, &session, &task_id).await?;
            let bytes = tokio::fs::read(&file).await?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let upload = UploadFile {
                mime_type: mime_for_file_name(&file_name)
                    .unwrap_or("application/octet-stream")
                    .to_string(),
                file_name,
                bytes,
            };
            report(view.choose_file(upload), &view.error)?;
            report(view.submit().await, &view.error)?;
            println!("{}", view.notice.as_deref().unwrap_or_default());
        }
        Command::Messages { search } => {
            let mut view = MessagesView::mount(state, &session).await?;
            view.set_search(&search);
            for contact in view.visible_contacts() {
                let unread = contact.messages.iter().filter(|m| !m.is_read && m.sender_email == contact.email).count();
                println!("  {} <{}> {} messages, {} unread", contact.name, contact.email, contact.messages.len(), unread);
            }
        }
        Command::Chat { email } => chat(state, session, &email).await?,
        Command::Send { to, content } => {
            let mut view = ComposeView::mount(state, &session)?;
            view.recipient_email = to;
            view.content = content;
            report(view.send().await, &view.error)?;
            println!("{}", view.notice.as_deref().unwrap_or_default());
        }
        Command::Notifications { search } => {
            let mut view = NotificationsView::mount(state, &session).await?;
            view.set_search(&search);
            for n in view.visible() {
                println!(
                    "  {}: {}",
                    n.title.as_deref().unwrap_or_default(),
                    n.message.as_deref().unwrap_or_default()
                );
            }
        }
        Command::CreateQuestionnaire { title, instructions, due, show, class_id, questions } => {
            let mut view = QuestionnaireBuilder::mount(state, &session, class_id)?;
            view.draft.title = title;
            view.draft.instructions = instructions;
            view.draft.due_date = due;
            view.draft.questions_to_show = show;
            for raw in &questions {
                add_question(&mut view, raw).map_err(ViewError::from)?;
            }
            report(view.submit().await, &view.error)?;
            println!("{}", view.notice.as_deref().unwrap_or_default());
        }
        Command::TakeQuestionnaire { questionnaire_id } => {
            let mut view = QuestionnaireTaker::mount(state, &session, &questionnaire_id).await?;
            let questions = view.questions.clone();
            let mut input = stdin_lines();
            for q in &questions {
                let choices = q.kind.choices();
                let label = if choices.is_empty() {
                    q.text.clone()
                } else {
                    format!("{} [{}]", q.text, choices.join(", "))
                };
                let answer = prompt(&mut input, &label).await?;
                view.answer(&q.id, &answer);
            }
            view.submit().await;
            println!("{}", if view.submitted { "Answers sent." } else { "Answers not sent." });
        }
        Command::Responses { questionnaire_id } => {
            let view = ResponsesView::mount(state, &session, &questionnaire_id).await?;
            for r in &view.respondents {
                println!("  {} ({})", r.email, r.id);
            }
        }
    }
    Ok(())
}

enum ChatEvent {
    Quit,
    Refreshed(Option<bool>),
    Typed(Option<String>),
}

/// Keeps a chat open until Ctrl-C or end of input. `/read <n>` marks line `n` as read.
async fn chat(state: AppState, session: SessionContext, email: &str) -> Result<(), PortalError> {
    let mut view = MessagesView::mount(state, &session).await?;
    if !view.open_chat(email) {
        return Err(PortalError::Internal(format!("no conversation with {}", email)));
    }
    print_chat(&view);

    let mut input = stdin_lines();
    loop {
        let event = tokio::select! {
            _ = tokio::signal::ctrl_c() => ChatEvent::Quit,
            update = view.next_update() => ChatEvent::Refreshed(update),
            line = input.next_line() => ChatEvent::Typed(line?),
        };
        match event {
            ChatEvent::Quit | ChatEvent::Refreshed(None) | ChatEvent::Typed(None) => break,
            ChatEvent::Refreshed(Some(_)) => print_chat(&view),
            ChatEvent::Typed(Some(text)) if text.starts_with("/read") => {
                let picked = text["/read".len()..].trim().parse::<usize>().ok();
                match picked.and_then(|n| view.mark_line_read(n)) {
                    Some(_) => println!("marked as read"),
                    None => println!("usage: /read <n> on an unread incoming line"),
                }
            }
            ChatEvent::Typed(Some(text)) => {
                view.draft = text;
                if view.send().await {
                    print_chat(&view);
                }
            }
        }
    }
    view.close_chat();
    Ok(())
}

fn print_chat(view: &MessagesView) {
    for (n, line) in view.chat_lines().iter().enumerate() {
        let flag = if line.can_mark_read { " (unread)" } else { "" };
        println!("[{}] {}: {}{}", n, line.author, line.content, flag);
    }
    println!("---");
}

fn add_question(view: &mut QuestionnaireBuilder, raw: &str) -> Result<(), alumnos_core::ValidationError> {
    let parts: Vec<&str> = raw.split('|').collect();
    let (tag, text) = match parts.as_slice() {
        ["boolean", text, ..] => (KindTag::Boolean, *text),
        ["multiple", text, ..] => (KindTag::Multiple, *text),
        [_, text, ..] => (KindTag::Open, *text),
        [text] => (KindTag::Open, *text),
        [] => (KindTag::Open, ""),
    };
    let i = view.draft.add_question();
    view.draft.set_text(i, text)?;
    view.draft.set_kind(i, tag)?;
    match (tag, parts.as_slice()) {
        (KindTag::Multiple, [_, _, options, answer, ..]) => {
            view.draft.set_options(i, options)?;
            view.draft.set_correct_answer(i, answer)
        }
        (KindTag::Multiple, [_, _, options]) => view.draft.set_options(i, options),
        (_, [_, _, answer, ..]) => view.draft.set_correct_answer(i, answer),
        _ => Ok(()),
    }
}

type Input = Lines<BufReader<Stdin>>;

fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

async fn prompt(input: &mut Input, question: &str) -> Result<String, PortalError> {
    println!("{}", question);
    Ok(input.next_line().await?.unwrap_or_default())
}

/// Prints the view's banner when an action failed.
fn report<T>(result: Result<T, ViewError>, banner: &Option<String>) -> Result<T, PortalError> {
    if result.is_err() {
        print_error(banner);
    }
    Ok(result?)
}

fn print_error(banner: &Option<String>) {
    if let Some(message) = banner {
        eprintln!("Error: {}", message);
    }
}
