//! In-memory bank backend.
//!
//! Implements every collaborator trait over a single data set loaded from
//! JSON. Responses are delivered through the virtual timer queue after the
//! configured latency, so views observe the same asynchronous shape a real
//! HTTP backend would give them.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "session_user_id": 1,
//!   "users": [
//!     { "id": 1, "name": "Alice Carter", "email": "alice@red.bank",
//!       "card": { "number": "4276380011112222", "balance": 2500.0 } }
//!   ],
//!   "transactions": [
//!     { "id": 1, "user_id": 1, "amount": 3000.0, "type": "top-up",
//!       "created_at": "2024-01-05T10:00:00Z" }
//!   ]
//! }
//! ```
//!
//! Transaction amounts are signed from the owner's point of view: money in is
//! positive, money out is negative.
//!
//! # Persistence
//!
//! [`MemoryBank::open`] binds the bank to a file. Every mutation is written
//! back with an atomic write (temp file + rename).

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};

use super::{
    CancellationToken, CardService, Completion, StatisticService, TransactionService, UserService,
};
use crate::browser::Scheduler;
use crate::domain::error::{AppError, Result};
use crate::domain::models::{
    BalanceAction, Card, Statistic, Transaction, TransactionKind, TransactionPage,
    TransferRequest, UserProfile,
};

const SEED: &str = include_str!("../../data/seed.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BankData {
    version: u32,
    #[serde(default)]
    session_user_id: Option<u64>,
    users: Vec<UserProfile>,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl BankData {
    fn session_index(&self) -> Result<usize> {
        let id = self
            .session_user_id
            .ok_or_else(|| AppError::Api("You need to be logged in".to_string()))?;
        self.users
            .iter()
            .position(|user| user.id == id)
            .ok_or_else(|| AppError::Api(format!("User {id} not found")))
    }

    fn record(&mut self, user_id: u64, amount: f64, kind: TransactionKind) {
        let id = self.transactions.iter().map(|tx| tx.id).max().unwrap_or(0) + 1;
        self.transactions.push(Transaction {
            id,
            user_id,
            amount,
            kind,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        });
    }

    fn apply_balance(&mut self, amount: f64, action: BalanceAction) -> Result<()> {
        let amount = validate_amount(amount)?;
        let idx = self.session_index()?;
        let user_id = self.users[idx].id;
        let card = &mut self.users[idx].card;
        let signed = match action {
            BalanceAction::TopUp => amount,
            BalanceAction::Withdrawal => {
                if card.balance < amount {
                    return Err(AppError::Api("Insufficient funds".to_string()));
                }
                -amount
            }
        };
        card.balance = round_cents(card.balance + signed);
        let kind = match action {
            BalanceAction::TopUp => TransactionKind::TopUp,
            BalanceAction::Withdrawal => TransactionKind::Withdrawal,
        };
        self.record(user_id, signed, kind);
        Ok(())
    }

    fn apply_transfer(&mut self, request: &TransferRequest) -> Result<()> {
        let amount = validate_amount(request.amount)?;
        let from = digits(&request.from_card_number);
        let to = digits(&request.to_card_number);

        let sender = self.session_index()?;
        if self.users[sender].card.number != from {
            return Err(AppError::Api(
                "Transfers can only be made from your own card".to_string(),
            ));
        }
        if from == to {
            return Err(AppError::Api("Cannot transfer to the same card".to_string()));
        }
        let recipient = self
            .users
            .iter()
            .position(|user| user.card.number == to)
            .ok_or_else(|| AppError::Api(format!("Card {to} not found")))?;
        if self.users[sender].card.balance < amount {
            return Err(AppError::Api("Insufficient funds".to_string()));
        }

        let sender_card = &mut self.users[sender].card;
        sender_card.balance = round_cents(sender_card.balance - amount);
        let recipient_card = &mut self.users[recipient].card;
        recipient_card.balance = round_cents(recipient_card.balance + amount);

        let (sender_id, recipient_id) = (self.users[sender].id, self.users[recipient].id);
        self.record(sender_id, -amount, TransactionKind::Transfer);
        self.record(recipient_id, amount, TransactionKind::Transfer);
        Ok(())
    }

    fn page_for(&self, user_id: u64) -> TransactionPage {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.id.cmp(&a.id));
        let length = transactions.len();
        TransactionPage {
            transactions,
            length,
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn digits(card_number: &str) -> String {
    card_number.chars().filter(char::is_ascii_digit).collect()
}

fn validate_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(round_cents(amount))
    } else {
        Err(AppError::InvalidArgument(format!(
            "amount must be a positive number, got {amount}"
        )))
    }
}

/// Seeded, single-process implementation of every collaborator service.
pub struct MemoryBank {
    scheduler: Rc<Scheduler>,
    latency: Duration,
    data: RefCell<BankData>,
    file_path: Option<PathBuf>,
}

impl std::fmt::Debug for MemoryBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("MemoryBank")
            .field("users", &data.users.len())
            .field("transactions", &data.transactions.len())
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl MemoryBank {
    /// A bank holding the bundled demo data.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the bundled seed does not parse.
    pub fn seeded(scheduler: Rc<Scheduler>, latency: Duration) -> Result<Self> {
        Self::from_json(SEED, scheduler, latency)
    }

    /// A bank holding the data set in `json`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for malformed JSON.
    pub fn from_json(json: &str, scheduler: Rc<Scheduler>, latency: Duration) -> Result<Self> {
        let data: BankData = serde_json::from_str(json)?;
        tracing::debug!(
            version = data.version,
            users = data.users.len(),
            transactions = data.transactions.len(),
            "Bank data loaded"
        );
        Ok(Self {
            scheduler,
            latency,
            data: RefCell::new(data),
            file_path: None,
        })
    }

    /// A bank persisted at `path`, seeded with the demo data when the file
    /// does not exist yet. Parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the existing
    /// file cannot be read or parsed.
    pub fn open(path: PathBuf, scheduler: Rc<Scheduler>, latency: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut bank = if path.exists() {
            tracing::debug!(path = ?path, "Loading bank data");
            Self::from_json(&std::fs::read_to_string(&path)?, scheduler, latency)?
        } else {
            tracing::debug!(path = ?path, "Seeding new bank data file");
            Self::seeded(scheduler, latency)?
        };
        bank.file_path = Some(path);
        bank.save()?;
        Ok(bank)
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Profile of the signed-in user.
    #[must_use]
    pub fn session_user(&self) -> Option<UserProfile> {
        let data = self.data.borrow();
        data.session_index().ok().map(|idx| data.users[idx].clone())
    }

    /// # Errors
    ///
    /// [`AppError::Api`] for an unknown user.
    pub fn sign_in(&self, user_id: u64) -> Result<()> {
        self.commit(|data| {
            if !data.users.iter().any(|user| user.id == user_id) {
                return Err(AppError::Api(format!("User {user_id} not found")));
            }
            data.session_user_id = Some(user_id);
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns an error if persisting the change fails.
    pub fn sign_out(&self) -> Result<()> {
        self.commit(|data| {
            data.session_user_id = None;
            Ok(())
        })
    }

    #[must_use]
    pub fn user(&self, id: u64) -> Option<UserProfile> {
        self.data
            .borrow()
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    /// Writes the data set to the bound file, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] when the temp file cannot be written or
    /// renamed.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&*self.data.borrow())
            .map_err(|e| AppError::Config(format!("failed to serialize bank data: {e}")))?;
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;
        tracing::trace!(path = ?path, "Bank data saved");
        Ok(())
    }

    fn respond<T: 'static>(
        &self,
        operation: &'static str,
        token: &CancellationToken,
        done: Completion<T>,
        result: Result<T>,
    ) {
        if let Err(err) = &result {
            tracing::debug!(operation, error = %err, "Request failed");
        }
        let token = token.clone();
        self.scheduler.set_timeout(self.latency, move || {
            if token.is_cancelled() {
                tracing::debug!(operation, "Dropping response for cancelled request");
                return;
            }
            done(result);
        });
    }

    /// Applies `change` to the data set and persists it. On any error the
    /// data set is restored, so a failed save leaves no trace in memory.
    fn commit(&self, change: impl FnOnce(&mut BankData) -> Result<()>) -> Result<()> {
        let snapshot = self.data.borrow().clone();
        let changed = change(&mut self.data.borrow_mut());
        let outcome = changed.and_then(|()| self.save());
        if let Err(err) = &outcome {
            tracing::debug!(error = %err, "Rolling back bank data");
            *self.data.borrow_mut() = snapshot;
        }
        outcome
    }

    fn contacts(&self, search: Option<&str>) -> Result<Vec<UserProfile>> {
        let data = self.data.borrow();
        let me = data.session_index().ok().map(|idx| data.users[idx].id);
        let contacts = data.users.iter().filter(|user| Some(user.id) != me);

        let term = search.map(str::trim).filter(|term| !term.is_empty());
        let Some(term) = term else {
            return Ok(contacts.cloned().collect());
        };

        let matcher = SkimMatcherV2::default();
        let mut ranked: Vec<(i64, &UserProfile)> = contacts
            .filter_map(|user| {
                let by_name = matcher.fuzzy_match(&user.name, term);
                let by_email = matcher.fuzzy_match(&user.email, term);
                by_name.max(by_email).map(|score| (score, user))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(ranked.into_iter().map(|(_, user)| user.clone()).collect())
    }

    fn statistics(&self) -> Result<Vec<Statistic>> {
        let data = self.data.borrow();
        let user_id = data.users[data.session_index()?].id;
        let (income, expense) = data
            .transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .fold((0.0, 0.0), |(income, expense), tx| {
                if tx.amount >= 0.0 {
                    (income + tx.amount, expense)
                } else {
                    (income, expense - tx.amount)
                }
            });
        Ok(vec![
            Statistic {
                label: "Income".to_string(),
                value: round_cents(income),
            },
            Statistic {
                label: "Expense".to_string(),
                value: round_cents(expense),
            },
        ])
    }
}

impl CardService for MemoryBank {
    fn by_user(&self, token: &CancellationToken, done: Completion<Card>) {
        let result = {
            let data = self.data.borrow();
            data.session_index().map(|idx| data.users[idx].card.clone())
        };
        self.respond("card.by_user", token, done, result);
    }

    fn update_balance(
        &self,
        amount: f64,
        action: BalanceAction,
        token: &CancellationToken,
        done: Completion<()>,
    ) {
        let _span = tracing::debug_span!("update_balance", amount, %action).entered();
        let result = self.commit(|data| data.apply_balance(amount, action));
        self.respond("card.update_balance", token, done, result);
    }

    fn transfer(&self, request: TransferRequest, token: &CancellationToken, done: Completion<()>) {
        let _span = tracing::debug_span!("transfer", amount = request.amount, to = %request.to_card_number).entered();
        let result = self.commit(|data| data.apply_transfer(&request));
        self.respond("card.transfer", token, done, result);
    }
}

impl UserService for MemoryBank {
    fn get_all(
        &self,
        search: Option<String>,
        token: &CancellationToken,
        done: Completion<Vec<UserProfile>>,
    ) {
        let result = self.contacts(search.as_deref());
        self.respond("users.get_all", token, done, result);
    }
}

impl TransactionService for MemoryBank {
    fn get_all(&self, token: &CancellationToken, done: Completion<TransactionPage>) {
        let result = {
            let data = self.data.borrow();
            data.session_index()
                .map(|idx| data.page_for(data.users[idx].id))
        };
        self.respond("transactions.get_all", token, done, result);
    }

    fn get_by_id(&self, user_id: u64, token: &CancellationToken, done: Completion<TransactionPage>) {
        let result = {
            let data = self.data.borrow();
            if data.users.iter().any(|user| user.id == user_id) {
                Ok(data.page_for(user_id))
            } else {
                Err(AppError::Api(format!("User {user_id} not found")))
            }
        };
        self.respond("transactions.get_by_id", token, done, result);
    }
}

impl StatisticService for MemoryBank {
    fn main(&self, token: &CancellationToken, done: Completion<Vec<Statistic>>) {
        let result = self.statistics();
        self.respond("statistics.main", token, done, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const LATENCY: Duration = Duration::from_millis(150);

    fn bank() -> (Rc<Scheduler>, MemoryBank) {
        let scheduler = Rc::new(Scheduler::new());
        let bank = MemoryBank::seeded(Rc::clone(&scheduler), LATENCY).unwrap();
        (scheduler, bank)
    }

    fn capture<T: 'static>() -> (Rc<RefCell<Option<Result<T>>>>, Completion<T>) {
        let slot = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&slot);
        (slot, Box::new(move |result: Result<T>| *sink.borrow_mut() = Some(result)))
    }

    #[test]
    fn responses_arrive_after_latency() {
        let (scheduler, bank) = bank();
        let (slot, done) = capture::<Card>();
        bank.by_user(&CancellationToken::new(), done);
        scheduler.advance(LATENCY - Duration::from_millis(1));
        assert!(slot.borrow().is_none());
        scheduler.advance(Duration::from_millis(1));
        let card = slot.borrow_mut().take().unwrap().unwrap();
        assert_eq!(card.number, "4276380011112222");
    }

    #[test]
    fn cancelled_requests_drop_their_continuation() {
        let (scheduler, bank) = bank();
        let called = Rc::new(Cell::new(false));
        let flag = Rc::clone(&called);
        let token = CancellationToken::new();
        StatisticService::main(&bank, &token, Box::new(move |_| flag.set(true)));
        token.cancel();
        scheduler.run_until_idle();
        assert!(!called.get());
    }

    #[test]
    fn transfer_moves_money_and_records_both_sides() {
        let (scheduler, bank) = bank();
        let (slot, done) = capture::<()>();
        bank.transfer(
            TransferRequest {
                amount: 100.0,
                from_card_number: "4276-3800-1111-2222".to_string(),
                to_card_number: "5469-5500-3333-4444".to_string(),
            },
            &CancellationToken::new(),
            done,
        );
        scheduler.run_until_idle();
        assert!(slot.borrow_mut().take().unwrap().is_ok());
        assert!((bank.user(1).unwrap().card.balance - 2400.0).abs() < f64::EPSILON);
        assert!((bank.user(2).unwrap().card.balance - 940.25).abs() < f64::EPSILON);

        let (page, done) = capture::<TransactionPage>();
        bank.get_by_id(2, &CancellationToken::new(), done);
        scheduler.run_until_idle();
        let page = page.borrow_mut().take().unwrap().unwrap();
        assert_eq!(page.length, 2);
        assert_eq!(page.transactions[0].kind, TransactionKind::Transfer);
        assert!((page.transactions[0].amount - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overdrafts_and_bad_amounts_are_rejected() {
        let (scheduler, bank) = bank();
        let (slot, done) = capture::<()>();
        bank.update_balance(1_000_000.0, BalanceAction::Withdrawal, &CancellationToken::new(), done);
        scheduler.run_until_idle();
        let err = slot.borrow_mut().take().unwrap().unwrap_err();
        assert!(matches!(err, AppError::Api(ref msg) if msg == "Insufficient funds"));

        let (slot, done) = capture::<()>();
        bank.update_balance(-5.0, BalanceAction::TopUp, &CancellationToken::new(), done);
        scheduler.run_until_idle();
        assert!(matches!(slot.borrow_mut().take().unwrap(), Err(AppError::InvalidArgument(_))));
        assert!((bank.user(1).unwrap().card.balance - 2500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn statistics_split_income_and_expense() {
        let (scheduler, bank) = bank();
        let (slot, done) = capture::<Vec<Statistic>>();
        StatisticService::main(&bank, &CancellationToken::new(), done);
        scheduler.run_until_idle();
        let stats = slot.borrow_mut().take().unwrap().unwrap();
        assert_eq!(stats[0].label, "Income");
        assert!((stats[0].value - 3000.0).abs() < f64::EPSILON);
        assert!((stats[1].value - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn contacts_exclude_self_and_rank_matches() {
        let (scheduler, bank) = bank();
        let (slot, done) = capture::<Vec<UserProfile>>();
        UserService::get_all(&bank, None, &CancellationToken::new(), done);
        scheduler.run_until_idle();
        let all = slot.borrow_mut().take().unwrap().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|user| user.id != 1));

        let (slot, done) = capture::<Vec<UserProfile>>();
        UserService::get_all(&bank, Some("carol".to_string()), &CancellationToken::new(), done);
        scheduler.run_until_idle();
        let found = slot.borrow_mut().take().unwrap().unwrap();
        assert_eq!(found[0].name, "Carol Nguyen");
    }

    #[test]
    fn signed_out_requests_fail() {
        let (scheduler, bank) = bank();
        bank.sign_out().unwrap();
        assert!(bank.session_user().is_none());
        let (slot, done) = capture::<Card>();
        bank.by_user(&CancellationToken::new(), done);
        scheduler.run_until_idle();
        assert!(matches!(slot.borrow_mut().take().unwrap(), Err(AppError::Api(_))));
    }

    #[test]
    fn open_persists_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bank.json");
        let scheduler = Rc::new(Scheduler::new());
        {
            let bank = MemoryBank::open(path.clone(), Rc::clone(&scheduler), LATENCY).unwrap();
            bank.update_balance(50.0, BalanceAction::TopUp, &CancellationToken::new(), Box::new(|_| {}));
            scheduler.run_until_idle();
        }
        let reopened = MemoryBank::open(path, scheduler, LATENCY).unwrap();
        assert!((reopened.user(1).unwrap().card.balance - 2550.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_save_rolls_back_the_change() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let scheduler = Rc::new(Scheduler::new());
        let bank = MemoryBank::open(nested.join("bank.json"), Rc::clone(&scheduler), LATENCY).unwrap();
        std::fs::remove_dir_all(&nested).unwrap();

        let (slot, done) = capture::<()>();
        bank.update_balance(100.0, BalanceAction::TopUp, &CancellationToken::new(), done);
        scheduler.run_until_idle();
        assert!(matches!(slot.borrow_mut().take().unwrap(), Err(AppError::Io(_))));

        let (slot, done) = capture::<()>();
        bank.transfer(
            TransferRequest {
                amount: 10.0,
                from_card_number: "4276380011112222".to_string(),
                to_card_number: "5469550033334444".to_string(),
            },
            &CancellationToken::new(),
            done,
        );
        scheduler.run_until_idle();
        assert!(matches!(slot.borrow_mut().take().unwrap(), Err(AppError::Io(_))));

        assert!(bank.sign_in(2).is_err());
        assert_eq!(bank.session_user().map(|user| user.id), Some(1));
        assert!((bank.user(1).unwrap().card.balance - 2500.0).abs() < f64::EPSILON);
        assert!((bank.user(2).unwrap().card.balance - 840.25).abs() < f64::EPSILON);

        let (page, done) = capture::<TransactionPage>();
        bank.get_by_id(1, &CancellationToken::new(), done);
        scheduler.run_until_idle();
        assert_eq!(page.borrow_mut().take().unwrap().unwrap().length, 3);
    }
}
