#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use redbank::api::{
    CancellationToken, CardService, Completion, MemoryBank, StatisticService, TransactionService,
    UserService,
};
use redbank::app::{Services, Session};
use redbank::browser::Window;
use redbank::domain::{BalanceAction, Card, Statistic, TransactionPage, TransferRequest, UserProfile};
use redbank::screens::ScreenFactory;
use redbank::{AppContext, Config, RouteTable, Router};

pub type CallLog = Rc<RefCell<Vec<&'static str>>>;

/// Forwards every call to a [`MemoryBank`] and records its name.
pub struct Recording {
    bank: Rc<MemoryBank>,
    log: CallLog,
}

impl Recording {
    fn record(&self, call: &'static str) {
        self.log.borrow_mut().push(call);
    }
}

impl CardService for Recording {
    fn by_user(&self, token: &CancellationToken, done: Completion<Card>) {
        self.record("cards.by_user");
        self.bank.by_user(token, done);
    }

    fn update_balance(
        &self,
        amount: f64,
        action: BalanceAction,
        token: &CancellationToken,
        done: Completion<()>,
    ) {
        self.record("cards.update_balance");
        self.bank.update_balance(amount, action, token, done);
    }

    fn transfer(&self, request: TransferRequest, token: &CancellationToken, done: Completion<()>) {
        self.record("cards.transfer");
        self.bank.transfer(request, token, done);
    }
}

impl UserService for Recording {
    fn get_all(
        &self,
        search: Option<String>,
        token: &CancellationToken,
        done: Completion<Vec<UserProfile>>,
    ) {
        self.record("users.get_all");
        UserService::get_all(&*self.bank, search, token, done);
    }
}

impl TransactionService for Recording {
    fn get_all(&self, token: &CancellationToken, done: Completion<TransactionPage>) {
        self.record("transactions.get_all");
        TransactionService::get_all(&*self.bank, token, done);
    }

    fn get_by_id(&self, user_id: u64, token: &CancellationToken, done: Completion<TransactionPage>) {
        self.record("transactions.get_by_id");
        self.bank.get_by_id(user_id, token, done);
    }
}

impl StatisticService for Recording {
    fn main(&self, token: &CancellationToken, done: Completion<Vec<Statistic>>) {
        self.record("statistics.main");
        self.bank.main(token, done);
    }
}

pub struct Harness {
    pub router: Router,
    pub bank: Rc<MemoryBank>,
    pub log: CallLog,
}

impl Harness {
    pub fn ctx(&self) -> &AppContext {
        self.router.context()
    }

    pub fn window(&self) -> &Window {
        &self.ctx().window
    }

    pub fn settle(&self) -> usize {
        self.ctx().scheduler().run_until_idle()
    }

    pub fn advance(&self, by: Duration) -> usize {
        self.ctx().scheduler().advance(by)
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn count(&self, call: &str) -> usize {
        self.log.borrow().iter().filter(|c| **c == call).count()
    }
}

pub fn context(window: Window, signed_in: bool) -> (AppContext, Rc<MemoryBank>, CallLog) {
    let bank = Rc::new(MemoryBank::seeded(window.scheduler(), Duration::from_millis(150)).unwrap());
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let recording = Rc::new(Recording {
        bank: Rc::clone(&bank),
        log: Rc::clone(&log),
    });
    let services = Services {
        cards: Rc::clone(&recording) as Rc<dyn CardService>,
        users: Rc::clone(&recording) as Rc<dyn UserService>,
        transactions: Rc::clone(&recording) as Rc<dyn TransactionService>,
        statistics: recording as Rc<dyn StatisticService>,
    };
    let session = Session::new(signed_in.then(|| bank.session_user()).flatten());
    let ctx = AppContext::new(window, Config::default(), session, services);
    (ctx, bank, log)
}

pub fn boot_with(path: &str, routes: RouteTable, signed_in: bool) -> Harness {
    let (ctx, bank, log) = context(Window::new(path), signed_in);
    let router = Router::start(ctx, routes, Box::new(ScreenFactory)).unwrap();
    Harness { router, bank, log }
}

pub fn boot(path: &str) -> Harness {
    boot_with(path, RouteTable::default(), true)
}
