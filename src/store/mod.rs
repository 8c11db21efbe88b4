// src/store/mod.rs

//! Flat-file repository.
//!
//! Users, quizzes and results are each held in memory and mirrored to one
//! text file; questions are kept on disk only, one file per quiz code. Every
//! mutation rewrites the whole backing file. A mutation is applied to a copy
//! first, so a failed write leaves the in-memory collection untouched.

pub mod codec;

use std::{
    fs,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use codec::LineRecord;

use crate::{
    config::{QUIZ_DATA_FILE, QUIZ_QUESTIONS_DIR, RESULTS_FILE, USERS_FILE},
    error::AppError,
    models::{
        question::Question,
        quiz::{Quiz, is_valid_code},
        quiz_result::QuizResult,
        user::User,
    },
};

/// Reads every decodable record from `path`. A missing file is an empty collection.
///
/// Undecodable lines are skipped and logged; they never fail the load.
pub fn load_all<R: LineRecord>(path: &Path) -> Result<Vec<R>, AppError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            tracing::error!("Failed to open {}: {}", path.display(), e);
            return Err(e.into());
        }
    };

    let mut records = Vec::new();
    for (number, bytes) in BufReader::new(file).split(b'\n').enumerate() {
        let bytes = bytes?;
        let Ok(line) = std::str::from_utf8(&bytes) else {
            tracing::warn!("Skipping non UTF-8 record at {}:{}", path.display(), number + 1);
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match R::decode(line) {
            Some(record) => records.push(record),
            None => tracing::warn!("Skipping malformed record at {}:{}", path.display(), number + 1),
        }
    }
    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Overwrites `path` with one encoded line per record, in order.
pub fn save_all<R: LineRecord>(path: &Path, records: &[R]) -> Result<(), AppError> {
    let write = || -> io::Result<()> {
        let mut writer = BufWriter::new(fs::File::create(path)?);
        for record in records {
            writeln!(writer, "{}", record.encode())?;
        }
        writer.flush()
    };
    write().map_err(|e| {
        tracing::error!("Failed to write {}: {}", path.display(), e);
        AppError::from(e)
    })
}

#[derive(Debug)]
pub struct Repository {
    root: PathBuf,
    users: Vec<User>,
    quizzes: Vec<Quiz>,
    results: Vec<QuizResult>,
}

impl Repository {
    /// Loads the three in-memory collections from `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        let users = load_all(&root.join(USERS_FILE))?;
        let quizzes = load_all(&root.join(QUIZ_DATA_FILE))?;
        let results = load_all(&root.join(RESULTS_FILE))?;
        tracing::info!(
            "Repository opened at {} ({} users, {} quizzes, {} results)",
            root.display(),
            users.len(),
            quizzes.len(),
            results.len()
        );
        Ok(Self { root, users, quizzes, results })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rewrites all three in-memory collections.
    pub fn flush(&self) -> Result<(), AppError> {
        save_all(&self.root.join(USERS_FILE), &self.users)?;
        save_all(&self.root.join(QUIZ_DATA_FILE), &self.quizzes)?;
        save_all(&self.root.join(RESULTS_FILE), &self.results)
    }

    // Users

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn insert_user(&mut self, user: User) -> Result<(), AppError> {
        if self.find_user(&user.username).is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        let mut next = self.users.clone();
        next.push(user);
        self.commit_users(next)
    }

    /// Applies `change` to the user named `username` and persists it.
    /// Returns `Ok(None)` when no such user exists.
    pub fn update_user<F>(&mut self, username: &str, change: F) -> Result<Option<User>, AppError>
    where
        F: FnOnce(&mut User),
    {
        let Some(index) = self.users.iter().position(|u| u.username == username) else {
            return Ok(None);
        };
        let mut next = self.users.clone();
        change(&mut next[index]);
        let updated = next[index].clone();
        self.commit_users(next)?;
        Ok(Some(updated))
    }

    fn commit_users(&mut self, next: Vec<User>) -> Result<(), AppError> {
        save_all(&self.root.join(USERS_FILE), &next)?;
        self.users = next;
        Ok(())
    }

    // Quizzes

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn find_quiz(&self, code: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.code == code)
    }

    pub fn insert_quiz(&mut self, quiz: Quiz) -> Result<(), AppError> {
        if self.find_quiz(&quiz.code).is_some() {
            return Err(AppError::Conflict("Quiz code already exists".to_string()));
        }
        let mut next = self.quizzes.clone();
        next.push(quiz);
        self.commit_quizzes(next)
    }

    /// Replaces the quiz with the same code. Returns `false` when there is none.
    pub fn replace_quiz(&mut self, quiz: Quiz) -> Result<bool, AppError> {
        let Some(index) = self.quizzes.iter().position(|q| q.code == quiz.code) else {
            return Ok(false);
        };
        let mut next = self.quizzes.clone();
        next[index] = quiz;
        self.commit_quizzes(next)?;
        Ok(true)
    }

    /// Removes the quiz and its question file. Returns the removed quiz, if any.
    pub fn remove_quiz(&mut self, code: &str) -> Result<Option<Quiz>, AppError> {
        let Some(index) = self.quizzes.iter().position(|q| q.code == code) else {
            return Ok(None);
        };
        self.delete_questions(code)?;
        let mut next = self.quizzes.clone();
        let removed = next.remove(index);
        self.commit_quizzes(next)?;
        Ok(Some(removed))
    }

    fn commit_quizzes(&mut self, next: Vec<Quiz>) -> Result<(), AppError> {
        save_all(&self.root.join(QUIZ_DATA_FILE), &next)?;
        self.quizzes = next;
        Ok(())
    }

    // Questions

    /// The question file of `code`. Codes that are not plain file names are refused.
    fn questions_path(&self, code: &str) -> Result<PathBuf, AppError> {
        if !is_valid_code(code) {
            tracing::warn!("Refusing question file for quiz code '{}'", code);
            return Err(AppError::BadRequest("Invalid quiz code".to_string()));
        }
        Ok(self.root.join(QUIZ_QUESTIONS_DIR).join(format!("{code}.txt")))
    }

    pub fn load_questions(&self, code: &str) -> Result<Vec<Question>, AppError> {
        load_all(&self.questions_path(code)?)
    }

    pub fn save_questions(&self, code: &str, questions: &[Question]) -> Result<(), AppError> {
        let path = self.questions_path(code)?;
        fs::create_dir_all(self.root.join(QUIZ_QUESTIONS_DIR))?;
        save_all(&path, questions)
    }

    fn delete_questions(&self, code: &str) -> Result<(), AppError> {
        // A stored code that is not a valid file name never had a question file.
        let Ok(path) = self.questions_path(code) else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // Results

    pub fn results(&self) -> &[QuizResult] {
        &self.results
    }

    pub fn results_for_user<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a QuizResult> + 'a {
        self.results.iter().filter(move |r| r.username == username)
    }

    pub fn append_result(&mut self, result: QuizResult) -> Result<(), AppError> {
        let mut next = self.results.clone();
        next.push(result);
        save_all(&self.root.join(RESULTS_FILE), &next)?;
        self.results = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quizdesk_store_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_files_load_as_empty() {
        let root = temp_root("missing");
        let repo = Repository::open(&root).unwrap();
        assert!(repo.users().is_empty());
        assert!(repo.quizzes().is_empty());
        assert!(repo.results().is_empty());
        assert!(repo.load_questions("nope").unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let root = temp_root("malformed");
        fs::write(
            root.join(QUIZ_DATA_FILE),
            "Q1:Math:Algebra:5\ngarbage\n\nQ2:Physics:Motion:ten\nQ3:Chem:Bonds:2\n",
        )
        .unwrap();
        let repo = Repository::open(&root).unwrap();
        let codes: Vec<_> = repo.quizzes().iter().map(|q| q.code.as_str()).collect();
        assert_eq!(codes, ["Q1", "Q3"]);
    }

    #[test]
    fn non_utf8_lines_are_skipped() {
        let root = temp_root("non_utf8");
        fs::write(
            root.join(QUIZ_DATA_FILE),
            b"Q1:Math:Algebra:5\n\xff\xfe:bad:line:3\nQ2:Physics:Motion:10\n",
        )
        .unwrap();
        let repo = Repository::open(&root).unwrap();
        let codes: Vec<_> = repo.quizzes().iter().map(|q| q.code.as_str()).collect();
        assert_eq!(codes, ["Q1", "Q2"]);
    }

    #[test]
    fn question_files_stay_inside_their_directory() {
        let root = temp_root("escape");
        fs::write(root.join(USERS_FILE), "bob;pw;Bob;2024-03-01 10:00:00;0;0\n").unwrap();
        let repo = Repository::open(&root).unwrap();
        repo.save_questions("Q1", &[]).unwrap();

        let err = repo.load_questions("../quiz_users").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = repo.save_questions("../quiz_users", &[]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let users = fs::read_to_string(root.join(USERS_FILE)).unwrap();
        assert!(users.starts_with("bob;pw;Bob"));
    }

    #[test]
    fn failed_question_delete_keeps_the_quiz() {
        let root = temp_root("failed_delete");
        let mut repo = Repository::open(&root).unwrap();
        repo.insert_quiz(Quiz {
            code: "Q1".to_string(),
            name: "Math".to_string(),
            subject: "Algebra".to_string(),
            timer_minutes: 1,
        })
        .unwrap();
        // A non-empty directory in place of the question file cannot be removed as a file.
        let blocker = root.join(QUIZ_QUESTIONS_DIR).join("Q1.txt");
        fs::create_dir_all(blocker.join("inner")).unwrap();

        assert!(repo.remove_quiz("Q1").is_err());
        assert!(repo.find_quiz("Q1").is_some());
        let reopened = Repository::open(&root).unwrap();
        assert!(reopened.find_quiz("Q1").is_some());
    }

    #[test]
    fn failed_write_keeps_memory_state() {
        let root = temp_root("failed_write");
        let mut repo = Repository::open(&root).unwrap();
        // A directory where the quiz file should be makes the rewrite fail.
        fs::create_dir_all(root.join(QUIZ_DATA_FILE)).unwrap();
        let quiz = Quiz {
            code: "Q1".to_string(),
            name: "Math".to_string(),
            subject: "Algebra".to_string(),
            timer_minutes: 1,
        };
        let err = repo.insert_quiz(quiz).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert!(repo.quizzes().is_empty());
    }
}
