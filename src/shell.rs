// src/shell.rs

//! Line-oriented console front end.
//!
//! Only reads input, calls the handlers and prints what they return. Errors
//! from a command are printed and the prompt comes back.

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::{
    attempt::{AttemptOutcome, Progress, runner::AttemptEvent},
    error::AppError,
    handlers::{
        admin,
        auth::{self, Session},
        profile, quiz,
    },
    models::{
        question::{CreateQuestionRequest, Question},
        quiz::{CreateQuizRequest, UpdateQuizRequest},
        user::{CreateUserRequest, LoginRequest, User},
    },
    state::AppState,
    utils::time::format_countdown,
};

type Input = Lines<BufReader<Stdin>>;

const GUEST_HELP: &str = "Commands: login, register, quit";
const USER_HELP: &str = "Commands: take <code>, profile, logout";
const ADMIN_HELP: &str = "Commands: quizzes, add-quiz, edit-quiz <code>, remove-quiz <code>, \
questions <code>, add-question <code>, remove-question <code>, users, logout";

pub async fn run(state: &mut AppState) -> Result<(), AppError> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut session: Option<Session> = None;

    println!("Quiz Desk");
    println!("{GUEST_HELP}");

    loop {
        let Some(line) = ask(&mut input, "> ").await? else {
            break;
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next().unwrap_or("");

        let outcome = match session.clone() {
            None => match command {
                "login" => login(state, &mut input).await.map(|s| {
                    println!("{}", if matches!(s, Session::Admin) { ADMIN_HELP } else { USER_HELP });
                    session = Some(s);
                }),
                "register" => register(state, &mut input).await,
                "quit" | "exit" => break,
                _ => {
                    println!("{GUEST_HELP}");
                    Ok(())
                }
            },
            Some(Session::User(user)) => match command {
                "take" => take_quiz(state, &mut input, &user, arg).await,
                "profile" => show_profile(state, &user.username),
                "logout" => {
                    logout(&mut session);
                    Ok(())
                }
                _ => {
                    println!("{USER_HELP}");
                    Ok(())
                }
            },
            Some(Session::Admin) => match command {
                "quizzes" => {
                    show_quizzes(state);
                    Ok(())
                }
                "add-quiz" => add_quiz(state, &mut input).await,
                "edit-quiz" => edit_quiz(state, &mut input, arg).await,
                "remove-quiz" => admin::delete_quiz(&mut state.repo, arg)
                    .map(|q| println!("Quiz {} removed together with its questions", q.code)),
                "questions" => admin::list_questions(&state.repo, arg).map(|qs| show_questions(&qs)),
                "add-question" => add_question(state, &mut input, arg).await,
                "remove-question" => remove_question(state, &mut input, arg).await,
                "users" => {
                    show_users(admin::list_users(&state.repo));
                    Ok(())
                }
                "logout" => {
                    logout(&mut session);
                    Ok(())
                }
                _ => {
                    println!("{ADMIN_HELP}");
                    Ok(())
                }
            },
        };

        if let Err(e) = outcome {
            tracing::debug!("Command '{}' failed: {:?}", command, e);
            println!("Error: {e}");
        }
    }

    Ok(())
}

async fn ask(input: &mut Input, label: &str) -> Result<Option<String>, AppError> {
    use std::io::Write;
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|l| l.trim().to_string()))
}

/// Like [`ask`], but treats end of input as an empty answer.
async fn field(input: &mut Input, label: &str) -> Result<String, AppError> {
    Ok(ask(input, label).await?.unwrap_or_default())
}

fn parse_timer(raw: &str) -> Result<u32, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Timer must be a number".to_string()))
}

fn logout(session: &mut Option<Session>) {
    *session = None;
    println!("{GUEST_HELP}");
}

async fn login(state: &mut AppState, input: &mut Input) -> Result<Session, AppError> {
    let username = field(input, "Username: ").await?;
    let password = field(input, "Password: ").await?;
    let session = auth::login(&mut state.repo, LoginRequest { username, password })?;
    match &session {
        Session::Admin => println!("Welcome, administrator"),
        Session::User(user) => println!("Welcome, {}", user.full_name),
    }
    Ok(session)
}

async fn register(state: &mut AppState, input: &mut Input) -> Result<(), AppError> {
    let full_name = field(input, "Full name: ").await?;
    let username = field(input, "Username: ").await?;
    let password = field(input, "Password: ").await?;
    auth::register(&mut state.repo, CreateUserRequest { full_name, username, password })?;
    println!("Account created successfully");
    Ok(())
}

fn show_profile(state: &AppState, username: &str) -> Result<(), AppError> {
    let summary = profile::get_profile(&state.repo, username)?;
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!("Failed to render profile: {}", e),
    }
    Ok(())
}

fn show_question(questions: &[Question], index: usize) {
    let Some(question) = questions.get(index) else {
        return;
    };
    println!();
    println!("{}. {}", index + 1, question.text);
    for (i, option) in question.options.iter().enumerate() {
        println!("   {}. {}", i + 1, option);
    }
}

fn show_outcome(outcome: &AttemptOutcome) {
    if outcome.timed_out {
        println!("Time's up! Quiz will now end.");
    }
    println!(
        "Quiz completed! Score: {}% ({} out of {} correct)",
        outcome.percent, outcome.result.score, outcome.result.total_questions
    );
}

async fn take_quiz(state: &mut AppState, input: &mut Input, user: &User, code: &str) -> Result<(), AppError> {
    let mut started = quiz::start_attempt(&state.repo, user, code)?;
    println!(
        "{} ({}): {} questions, {} minute(s). Answer with the option number.",
        started.quiz.name,
        started.quiz.subject,
        started.questions.len(),
        started.quiz.timer_minutes
    );
    show_question(&started.questions, 0);

    loop {
        tokio::select! {
            event = started.events.recv() => match event {
                Some(AttemptEvent::Tick { seconds_remaining }) => {
                    if seconds_remaining % 30 == 0 || seconds_remaining <= 10 {
                        println!("Time remaining: {}", format_countdown(seconds_remaining));
                    }
                }
                Some(AttemptEvent::Completed(outcome)) => {
                    show_outcome(&outcome);
                    return quiz::record_result(&mut state.repo, &outcome);
                }
                None => return Ok(()),
            },
            line = input.next_line() => {
                let Some(line) = line? else {
                    tracing::warn!("Input closed during an attempt by '{}'; result discarded", user.username);
                    return Ok(());
                };
                let selected = line.trim().parse::<usize>().ok();
                match started.handle.submit_answer(selected).await {
                    Ok(Progress::Next { question_index }) => show_question(&started.questions, question_index),
                    // The completion event follows on the event channel.
                    Ok(Progress::Completed(_)) | Err(AppError::AttemptClosed) => {}
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}

fn show_quizzes(state: &AppState) {
    let quizzes = quiz::list_quizzes(&state.repo);
    if quizzes.is_empty() {
        println!("No quizzes available");
        return;
    }
    println!("{:<12} {:<24} {:<16} {}", "Code", "Name", "Subject", "Timer (min)");
    for q in quizzes {
        println!("{:<12} {:<24} {:<16} {}", q.code, q.name, q.subject, q.timer_minutes);
    }
}

fn show_questions(questions: &[Question]) {
    if questions.is_empty() {
        println!("No questions");
        return;
    }
    for (i, q) in questions.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, q.text, q.options.join(", "));
    }
}

fn show_users(users: &[User]) {
    println!("{:<16} {:<24} {:<20} {:<6} {}", "Username", "Full name", "Last login", "Taken", "High");
    for u in users {
        println!(
            "{:<16} {:<24} {:<20} {:<6} {}%",
            u.username,
            u.full_name,
            u.last_login.to_string(),
            u.quizzes_taken,
            u.high_score
        );
    }
}

async fn add_quiz(state: &mut AppState, input: &mut Input) -> Result<(), AppError> {
    let code = field(input, "Quiz code: ").await?;
    let name = field(input, "Quiz name: ").await?;
    let subject = field(input, "Subject: ").await?;
    let timer_minutes = parse_timer(&field(input, "Timer (minutes): ").await?)?;
    let quiz = admin::create_quiz(&mut state.repo, CreateQuizRequest { code, name, subject, timer_minutes })?;
    println!("Quiz {} added successfully", quiz.code);
    Ok(())
}

async fn edit_quiz(state: &mut AppState, input: &mut Input, code: &str) -> Result<(), AppError> {
    let current = quiz::find_quiz(&state.repo, code)?.clone();
    println!("Editing {} (code cannot be changed); leave blank to keep a value", current.code);

    let name = Some(field(input, &format!("Quiz name [{}]: ", current.name)).await?)
        .filter(|s| !s.is_empty())
        .unwrap_or(current.name);
    let subject = Some(field(input, &format!("Subject [{}]: ", current.subject)).await?)
        .filter(|s| !s.is_empty())
        .unwrap_or(current.subject);
    let timer = field(input, &format!("Timer (minutes) [{}]: ", current.timer_minutes)).await?;
    let timer_minutes = if timer.is_empty() { current.timer_minutes } else { parse_timer(&timer)? };

    admin::update_quiz(&mut state.repo, &current.code, UpdateQuizRequest { name, subject, timer_minutes })?;
    println!("Quiz updated successfully");
    Ok(())
}

async fn add_question(state: &mut AppState, input: &mut Input, code: &str) -> Result<(), AppError> {
    quiz::find_quiz(&state.repo, code)?;

    let text = field(input, "Question: ").await?;
    let mut options = Vec::with_capacity(4);
    for i in 1..=4 {
        options.push(field(input, &format!("Option {i}: ")).await?);
    }
    let correct = field(input, "Correct option (1-4): ").await?;
    let correct_option = correct
        .parse()
        .map_err(|_| AppError::BadRequest("Correct option must be a number".to_string()))?;

    let options: Vec<&str> = options.iter().map(String::as_str).collect();
    let payload = CreateQuestionRequest::new(&text, &options, correct_option);
    admin::add_question(&mut state.repo, code, payload)?;
    println!("Question added successfully");
    Ok(())
}

async fn remove_question(state: &mut AppState, input: &mut Input, code: &str) -> Result<(), AppError> {
    let text = field(input, "Question text: ").await?;
    admin::delete_question(&mut state.repo, code, &text)?;
    println!("Question removed successfully");
    Ok(())
}
