// crates/market-client/src/app.rs

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use indexmap::IndexMap;
use tracing::{debug, info};

use market_core::{
    format_currency, parse_positive_amount, AlertCondition, AlertStore, KeyValueStore, Listing,
    MarketView, NotificationCenter, NotificationPhase, OfferForm, OfferStatus, PriceAlert,
    RandomSource, Scheduler, Session, UserProfile,
};
use market_protocol::fallback::fallback_profile;
use market_protocol::AppData;
use market_server::DataOrigin;

use crate::config::{ClientConfig, Theme};

pub enum InputMode {
    Normal,
    /// Typing into the search box.
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Market,
    Wallet,
}

/// Direction of the last price change of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceMove {
    Up,
    Down,
    Flat,
}

/// State of the alert dialog for one listing.
#[derive(Debug, Clone)]
pub struct AlertEditor {
    pub listing_id: String,
    pub crop_name: String,
    pub current_price: f64,
    pub price_unit: String,
    pub condition: AlertCondition,
    pub target_input: String,
    /// An alert already exists (dialog offers removal).
    pub existing: bool,
}

/// Editable profile fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Title,
    Email,
    Phone,
    Location,
    FarmName,
    FarmReg,
    FarmCrops,
}

impl ProfileField {
    pub const ALL: [ProfileField; 8] = [
        ProfileField::Name,
        ProfileField::Title,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Location,
        ProfileField::FarmName,
        ProfileField::FarmReg,
        ProfileField::FarmCrops,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Full name",
            ProfileField::Title => "Title",
            ProfileField::Email => "Email",
            ProfileField::Phone => "Phone",
            ProfileField::Location => "Location",
            ProfileField::FarmName => "Farm name",
            ProfileField::FarmReg => "Registration",
            ProfileField::FarmCrops => "Main crops",
        }
    }

    pub fn value(self, profile: &UserProfile) -> &str {
        match self {
            ProfileField::Name => &profile.name,
            ProfileField::Title => &profile.title,
            ProfileField::Email => &profile.email,
            ProfileField::Phone => &profile.phone,
            ProfileField::Location => &profile.location,
            ProfileField::FarmName => &profile.farm.name,
            ProfileField::FarmReg => &profile.farm.reg,
            ProfileField::FarmCrops => &profile.farm.crops,
        }
    }

    fn value_mut(self, profile: &mut UserProfile) -> &mut String {
        match self {
            ProfileField::Name => &mut profile.name,
            ProfileField::Title => &mut profile.title,
            ProfileField::Email => &mut profile.email,
            ProfileField::Phone => &mut profile.phone,
            ProfileField::Location => &mut profile.location,
            ProfileField::FarmName => &mut profile.farm.name,
            ProfileField::FarmReg => &mut profile.farm.reg,
            ProfileField::FarmCrops => &mut profile.farm.crops,
        }
    }
}

/// Draft of the user profile being edited.
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    pub draft: UserProfile,
    pub focus: usize,
}

impl ProfileEditor {
    pub fn new(profile: UserProfile) -> Self {
        ProfileEditor {
            draft: profile,
            focus: 0,
        }
    }

    pub fn field(&self) -> ProfileField {
        ProfileField::ALL[self.focus]
    }

    fn next(&mut self) {
        self.focus = (self.focus + 1) % ProfileField::ALL.len();
    }

    fn prev(&mut self) {
        self.focus = (self.focus + ProfileField::ALL.len() - 1) % ProfileField::ALL.len();
    }
}

pub enum Overlay {
    None,
    Help,
    AlertEditor(AlertEditor),
    Offer(OfferForm),
    Profile(ProfileEditor),
}

/// Values the app takes from the merged CLI/TOML configuration.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub tick_interval: Duration,
    pub theme: Theme,
}

impl From<&ClientConfig> for AppSettings {
    fn from(config: &ClientConfig) -> Self {
        AppSettings {
            tick_interval: config.tick_interval(),
            theme: config.theme,
        }
    }
}

pub type RandomFactory = Box<dyn FnMut() -> Box<dyn RandomSource>>;

pub struct App {
    scheduler: Rc<dyn Scheduler>,
    store: Rc<dyn KeyValueStore>,
    make_rng: RandomFactory,
    settings: AppSettings,

    pub session: Session,
    pub notifications: NotificationCenter,
    view: Option<MarketView>,

    // Loaded market data
    pub data: Option<AppData>,
    pub data_origin: Option<DataOrigin>,

    // Written by the view's listing observer
    moves: Rc<RefCell<IndexMap<String, PriceMove>>>,
    last_update: Rc<RefCell<Option<DateTime<Local>>>>,

    // UI state
    pub input_mode: InputMode,
    pub panel: Panel,
    pub overlay: Overlay,
    pub search: String,
    pub selected: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        settings: AppSettings,
        scheduler: Rc<dyn Scheduler>,
        store: Rc<dyn KeyValueStore>,
        make_rng: RandomFactory,
    ) -> Self {
        let notifications = NotificationCenter::new(scheduler.clone());
        Self {
            session: Session::new(store.clone()),
            scheduler,
            store,
            make_rng,
            settings,
            notifications,
            view: None,
            data: None,
            data_origin: None,
            moves: Rc::new(RefCell::new(IndexMap::new())),
            last_update: Rc::new(RefCell::new(None)),
            input_mode: InputMode::Normal,
            panel: Panel::Market,
            overlay: Overlay::None,
            search: String::new(),
            selected: 0,
            should_quit: false,
        }
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_authenticated()
    }

    // -------------------------------------------------------------------------
    // Session lifecycle
    // -------------------------------------------------------------------------

    /// Authenticate and mount the market view.
    pub fn login(&mut self) {
        if self.is_logged_in() {
            return;
        }
        let fallback = self
            .data
            .as_ref()
            .map(|d| d.user_profile.clone())
            .unwrap_or_else(fallback_profile);
        self.session.login(fallback);

        let mut view = MarketView::new(
            AlertStore::new(self.store.clone()),
            self.notifications.clone(),
            (self.make_rng)(),
        );

        let moves = self.moves.clone();
        let last_update = self.last_update.clone();
        let mut previous: IndexMap<String, f64> = IndexMap::new();
        view.subscribe(move |listings| {
            let mut moves = moves.borrow_mut();
            moves.clear();
            for listing in listings {
                let direction = match previous.get(&listing.id) {
                    Some(prev) if listing.price > *prev => PriceMove::Up,
                    Some(prev) if listing.price < *prev => PriceMove::Down,
                    _ => PriceMove::Flat,
                };
                moves.insert(listing.id.clone(), direction);
                previous.insert(listing.id.clone(), listing.price);
            }
            *last_update.borrow_mut() = Some(Local::now());
        });

        view.mount(self.scheduler.as_ref(), self.settings.tick_interval);
        if let Some(data) = &self.data {
            view.replace_listings(data.market_listings.clone());
        }

        self.view = Some(view);
        self.panel = Panel::Market;
        self.selected = 0;
    }

    /// Tear down the market view and every timer it owns.
    pub fn logout(&mut self) {
        self.overlay = Overlay::None;
        if let Some(mut view) = self.view.take() {
            view.unmount();
        }
        self.session.logout();
        self.moves.borrow_mut().clear();
        *self.last_update.borrow_mut() = None;
        self.search.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Final teardown before the terminal is restored.
    pub fn shutdown(&mut self) {
        self.logout();
        self.notifications.shutdown();
    }

    /// Install freshly loaded market data. Arrives asynchronously, possibly
    /// after the view was mounted.
    pub fn set_market_data(&mut self, data: AppData, origin: DataOrigin) {
        info!(?origin, listings = data.market_listings.len(), "market data loaded");
        if let Some(view) = &self.view {
            view.replace_listings(data.market_listings.clone());
        }
        self.data = Some(data);
        self.data_origin = Some(origin);
    }

    // -------------------------------------------------------------------------
    // Queries used by the UI
    // -------------------------------------------------------------------------

    /// Listings matching the search box.
    pub fn visible_listings(&self) -> Vec<Listing> {
        match &self.view {
            Some(view) => view.search(&self.search),
            None => Vec::new(),
        }
    }

    pub fn selected_listing(&self) -> Option<Listing> {
        self.visible_listings().into_iter().nth(self.selected)
    }

    /// Ids of listings that currently carry an alert.
    pub fn alert_ids(&self) -> HashSet<String> {
        match &self.view {
            Some(view) => view.alerts().load().into_iter().map(|a| a.crop_id).collect(),
            None => HashSet::new(),
        }
    }

    /// Alert on the selected listing, if any.
    pub fn selected_alert(&self) -> Option<PriceAlert> {
        let listing = self.selected_listing()?;
        self.view.as_ref()?.alerts().get(&listing.id)
    }

    pub fn price_move(&self, id: &str) -> PriceMove {
        self.moves.borrow().get(id).copied().unwrap_or(PriceMove::Flat)
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        *self.last_update.borrow()
    }

    pub fn tick_count(&self) -> u64 {
        self.view.as_ref().map(|v| v.tick_count()).unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn handle_key(&mut self, code: KeyCode) {
        if !self.is_logged_in() {
            match code {
                KeyCode::Enter | KeyCode::Char('l') => self.login(),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match self.overlay {
            Overlay::Help => {
                if matches!(code, KeyCode::F(1) | KeyCode::Esc | KeyCode::Char('?')) {
                    self.overlay = Overlay::None;
                }
                return;
            }
            Overlay::AlertEditor(_) => {
                self.handle_alert_key(code);
                return;
            }
            Overlay::Offer(_) => {
                self.handle_offer_key(code);
                return;
            }
            Overlay::Profile(_) => {
                self.handle_profile_key(code);
                return;
            }
            Overlay::None => {}
        }

        match self.input_mode {
            InputMode::Editing => self.handle_search_key(code),
            InputMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                KeyCode::Tab | KeyCode::BackTab => self.toggle_panel(),
                KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
                KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
                KeyCode::Char('/') => self.input_mode = InputMode::Editing,
                KeyCode::Char('a') | KeyCode::Char('A') => self.open_alert_editor(),
                KeyCode::Char('o') | KeyCode::Char('O') => self.open_offer(),
                KeyCode::Char('x') | KeyCode::Char('X') => self.dismiss_latest(),
                KeyCode::Char('L') => self.logout(),
                KeyCode::Char('p') | KeyCode::Char('P') => self.open_profile_editor(),
                KeyCode::F(1) | KeyCode::Char('?') => self.overlay = Overlay::Help,
                _ => {}
            },
        }
    }

    fn toggle_panel(&mut self) {
        self.panel = match self.panel {
            Panel::Market => Panel::Wallet,
            Panel::Wallet => Panel::Market,
        };
    }

    pub fn move_selection_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let count = self.visible_listings().len();
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.search.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(c) => self.search.push(c),
            _ => return,
        }
        self.selected = 0;
    }

    /// Dismiss the newest notification that is still fully visible.
    pub fn dismiss_latest(&mut self) {
        let newest = self
            .notifications
            .messages()
            .into_iter()
            .rev()
            .find(|m| m.phase == NotificationPhase::Visible);
        if let Some(message) = newest {
            self.notifications.dismiss(message.id);
        }
    }

    // -------------------------------------------------------------------------
    // Alert dialog
    // -------------------------------------------------------------------------

    pub fn open_alert_editor(&mut self) {
        let (Some(listing), Some(view)) = (self.selected_listing(), &self.view) else {
            return;
        };
        let existing = view.alerts().get(&listing.id);
        let editor = AlertEditor {
            condition: existing.as_ref().map(|a| a.condition).unwrap_or(AlertCondition::Above),
            target_input: existing
                .as_ref()
                .map(|a| a.target_price.to_string())
                .unwrap_or_else(|| format!("{:.2}", listing.price)),
            existing: existing.is_some(),
            listing_id: listing.id,
            crop_name: listing.name,
            current_price: listing.price,
            price_unit: listing.price_unit,
        };
        self.overlay = Overlay::AlertEditor(editor);
    }

    fn handle_alert_key(&mut self, code: KeyCode) {
        let Overlay::AlertEditor(editor) = &mut self.overlay else {
            return;
        };
        match code {
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                editor.condition = editor.condition.toggled();
            }
            KeyCode::Backspace => {
                editor.target_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == ',' => {
                editor.target_input.push(c);
            }
            KeyCode::Delete => self.remove_alert(),
            KeyCode::Enter => self.save_alert(),
            _ => {}
        }
    }

    fn save_alert(&mut self) {
        let (Overlay::AlertEditor(editor), Some(view)) = (&self.overlay, &self.view) else {
            return;
        };
        let Some(target) = parse_positive_amount(&editor.target_input) else {
            self.notifications.post("Please enter a valid target price.");
            return;
        };

        match view.set_alert(&editor.listing_id, editor.condition, target) {
            Ok(alert) => {
                debug!(crop_id = %alert.crop_id, "alert saved from dialog");
                self.notifications.post(format!(
                    "Alert set: {} {} {}",
                    alert.crop_name,
                    alert.condition.as_str(),
                    format_currency(alert.target_price)
                ));
                self.overlay = Overlay::None;
            }
            Err(e) => {
                self.notifications.post(format!("Could not save alert: {e}"));
            }
        }
    }

    fn remove_alert(&mut self) {
        let (Overlay::AlertEditor(editor), Some(view)) = (&self.overlay, &self.view) else {
            return;
        };
        if !editor.existing {
            return;
        }
        match view.remove_alert(&editor.listing_id) {
            Ok(()) => {
                self.notifications
                    .post(format!("Alert removed for {}", editor.crop_name));
                self.overlay = Overlay::None;
            }
            Err(e) => {
                self.notifications.post(format!("Could not remove alert: {e}"));
            }
        }
    }

    // -------------------------------------------------------------------------
    // Offer dialog
    // -------------------------------------------------------------------------

    pub fn open_offer(&mut self) {
        if let Some(listing) = self.selected_listing() {
            self.overlay = Overlay::Offer(OfferForm::new(listing.id));
        }
    }

    fn handle_offer_key(&mut self, code: KeyCode) {
        let Overlay::Offer(form) = &mut self.overlay else {
            return;
        };
        if form.status() == OfferStatus::Success {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.overlay = Overlay::None;
            }
            return;
        }

        match code {
            // Dropping the form cancels a pending submission.
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Char('+') | KeyCode::Up => form.quantity.increment(),
            KeyCode::Char('-') | KeyCode::Down => form.quantity.decrement(),
            KeyCode::Backspace if form.status() == OfferStatus::Idle => {
                form.price_input.pop();
            }
            KeyCode::Char(c)
                if form.status() == OfferStatus::Idle && (c.is_ascii_digit() || c == '.') =>
            {
                form.price_input.push(c);
            }
            KeyCode::Enter => {
                if !form.submit(self.scheduler.as_ref()) && form.status() == OfferStatus::Idle {
                    self.notifications.post("Enter a valid offer price first.");
                }
            }
            _ => {}
        }
    }

    /// Listing shown in the offer dialog.
    pub fn offer_listing(&self) -> Option<Listing> {
        match (&self.overlay, &self.view) {
            (Overlay::Offer(form), Some(view)) => view.listing(&form.listing_id),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Profile dialog
    // -------------------------------------------------------------------------

    pub fn open_profile_editor(&mut self) {
        if let Some(profile) = self.session.profile() {
            self.overlay = Overlay::Profile(ProfileEditor::new(profile.clone()));
        }
    }

    fn handle_profile_key(&mut self, code: KeyCode) {
        let Overlay::Profile(editor) = &mut self.overlay else {
            return;
        };
        match code {
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Tab | KeyCode::Down => editor.next(),
            KeyCode::BackTab | KeyCode::Up => editor.prev(),
            KeyCode::Backspace => {
                editor.field().value_mut(&mut editor.draft).pop();
            }
            KeyCode::Char(c) => editor.field().value_mut(&mut editor.draft).push(c),
            KeyCode::Enter => self.save_profile(),
            _ => {}
        }
    }

    fn save_profile(&mut self) {
        let Overlay::Profile(editor) = &self.overlay else {
            return;
        };
        if editor.draft.name.trim().is_empty() {
            self.notifications.post("Name cannot be empty.");
            return;
        }

        let draft = editor.draft.clone();
        match self.session.save_profile(draft) {
            Ok(()) => {
                info!("profile updated");
                self.notifications.post("Profile updated.");
                self.overlay = Overlay::None;
            }
            Err(e) => {
                self.notifications.post(format!("Could not save profile: {e}"));
            }
        }
    }
}

/// App wired to a virtual clock, in-memory storage and a constant draw.
#[cfg(test)]
pub(crate) fn test_app(
    draw: f64,
) -> (App, market_core::VirtualScheduler, market_core::MemoryStore) {
    use market_core::{MemoryStore, SequenceRandom, VirtualScheduler};

    let sched = VirtualScheduler::new();
    let store = MemoryStore::new();
    let settings = AppSettings {
        tick_interval: Duration::from_millis(5000),
        theme: Theme::Dark,
    };
    let app = App::new(
        settings,
        Rc::new(sched.clone()),
        Rc::new(store.clone()),
        Box::new(move || Box::new(SequenceRandom::constant(draw))),
    );
    (app, sched, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::{MemoryStore, VirtualScheduler};
    use market_protocol::fallback_app_data;

    const TICK: Duration = Duration::from_millis(5000);

    fn app_with(draw: f64) -> (App, VirtualScheduler, MemoryStore) {
        test_app(draw)
    }

    fn logged_in(draw: f64) -> (App, VirtualScheduler, MemoryStore) {
        let (mut app, sched, store) = app_with(draw);
        app.set_market_data(fallback_app_data(), DataOrigin::Fallback);
        app.handle_key(KeyCode::Enter);
        (app, sched, store)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn login_mounts_and_logout_cancels_every_timer() {
        let (mut app, sched, _) = logged_in(1.0);
        assert!(app.is_logged_in());
        assert_eq!(app.visible_listings().len(), 8);
        assert_eq!(app.session.profile().unwrap().name, "AJAYI OLALEKAN");

        sched.advance(TICK);
        assert_eq!(app.tick_count(), 1);
        assert_eq!(app.price_move("1"), PriceMove::Up);

        app.notifications.post("hello");
        app.handle_key(KeyCode::Char('L'));
        assert!(!app.is_logged_in());
        assert_eq!(sched.pending(), 0);
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn data_arriving_after_login_fills_the_market() {
        let (mut app, _, _) = app_with(0.5);
        app.login();
        assert!(app.visible_listings().is_empty());

        app.set_market_data(fallback_app_data(), DataOrigin::Source);
        assert_eq!(app.visible_listings().len(), 8);
    }

    #[test]
    fn search_filters_by_name_or_farm() {
        let (mut app, _, _) = logged_in(0.5);
        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "kericho");
        app.handle_key(KeyCode::Enter);

        let visible = app.visible_listings();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Kenyan Tea");
    }

    #[test]
    fn alert_dialog_prefills_current_price_and_saves() {
        let (mut app, sched, _) = logged_in(1.0);
        // Kenyan Tea is the seventh listing.
        for _ in 0..6 {
            app.handle_key(KeyCode::Down);
        }
        app.handle_key(KeyCode::Char('a'));
        match &app.overlay {
            Overlay::AlertEditor(editor) => {
                assert_eq!(editor.listing_id, "7");
                assert_eq!(editor.target_input, "3500.00");
                assert_eq!(editor.condition, AlertCondition::Above);
                assert!(!editor.existing);
            }
            _ => panic!("alert dialog not open"),
        }

        for _ in 0..7 {
            app.handle_key(KeyCode::Backspace);
        }
        type_text(&mut app, "3530");
        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.overlay, Overlay::None));
        assert!(app.alert_ids().contains("7"));

        sched.advance(TICK);
        assert!(!app.alert_ids().contains("7"));
        let texts: Vec<String> = app.notifications.messages().into_iter().map(|m| m.message).collect();
        assert!(texts.iter().any(|t| t.starts_with("Price Alert: Kenyan Tea reached")));
    }

    #[test]
    fn invalid_target_keeps_the_dialog_open() {
        let (mut app, _, store) = logged_in(0.5);
        app.handle_key(KeyCode::Char('a'));
        for _ in 0..10 {
            app.handle_key(KeyCode::Backspace);
        }
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.overlay, Overlay::AlertEditor(_)));
        assert_eq!(store.write_count(), 1); // profile only
        assert_eq!(app.notifications.len(), 1);
    }

    #[test]
    fn existing_alert_can_be_removed_from_the_dialog() {
        let (mut app, _, _) = logged_in(0.5);
        app.handle_key(KeyCode::Char('a'));
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Enter);
        assert!(app.alert_ids().contains("1"));

        app.handle_key(KeyCode::Char('a'));
        match &app.overlay {
            Overlay::AlertEditor(editor) => {
                assert!(editor.existing);
                assert_eq!(editor.condition, AlertCondition::Below);
            }
            _ => panic!("alert dialog not open"),
        }
        app.handle_key(KeyCode::Delete);
        assert!(app.alert_ids().is_empty());
    }

    #[test]
    fn offer_submits_after_the_simulated_delay() {
        let (mut app, sched, _) = logged_in(0.5);
        app.handle_key(KeyCode::Char('o'));
        app.handle_key(KeyCode::Enter);
        // Zero total: refused.
        assert_eq!(app.notifications.len(), 1);

        type_text(&mut app, "100");
        match &app.overlay {
            Overlay::Offer(form) => {
                let quote = form.quote();
                assert_eq!(quote.total, 1010.0);
            }
            _ => panic!("offer dialog not open"),
        }
        app.handle_key(KeyCode::Enter);
        sched.advance(Duration::from_millis(2000));
        match &app.overlay {
            Overlay::Offer(form) => assert_eq!(form.status(), OfferStatus::Success),
            _ => panic!("offer dialog not open"),
        }
        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[test]
    fn closing_a_submitting_offer_cancels_its_timer() {
        let (mut app, sched, _) = logged_in(0.5);
        app.handle_key(KeyCode::Char('o'));
        type_text(&mut app, "5");
        app.handle_key(KeyCode::Enter);
        let before = sched.pending();

        app.handle_key(KeyCode::Esc);
        assert_eq!(sched.pending(), before - 1);
    }

    #[test]
    fn dismiss_targets_the_newest_visible_message() {
        let (mut app, _, _) = logged_in(0.5);
        let first = app.notifications.post("first");
        app.notifications.post("second");

        app.handle_key(KeyCode::Char('x'));
        let phases: Vec<_> = app
            .notifications
            .messages()
            .into_iter()
            .map(|m| (m.id == first, m.phase))
            .collect();
        assert_eq!(
            phases,
            vec![
                (true, NotificationPhase::Visible),
                (false, NotificationPhase::Exiting),
            ]
        );
    }

    #[test]
    fn profile_edits_are_saved_and_survive_the_next_login() {
        let (mut app, _, store) = logged_in(0.5);
        app.handle_key(KeyCode::Char('p'));
        for _ in 0.."AJAYI OLALEKAN".len() {
            app.handle_key(KeyCode::Backspace);
        }
        type_text(&mut app, "Ada Farmer");
        // Jump to the crop list and append to it.
        for _ in 0..7 {
            app.handle_key(KeyCode::Tab);
        }
        type_text(&mut app, ", Yam");
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.overlay, Overlay::None));
        let saved = app.session.profile().unwrap();
        assert_eq!(saved.name, "Ada Farmer");
        assert_eq!(saved.farm.crops, "Ginger, Cocoa, Yam");

        let mut next = Session::new(Rc::new(store.clone()));
        next.login(fallback_profile());
        assert_eq!(next.profile().unwrap().name, "Ada Farmer");
    }

    #[test]
    fn blank_profile_name_is_refused() {
        let (mut app, _, store) = logged_in(0.5);
        let writes = store.write_count();
        app.handle_key(KeyCode::Char('p'));
        for _ in 0..40 {
            app.handle_key(KeyCode::Backspace);
        }
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.overlay, Overlay::Profile(_)));
        assert_eq!(store.write_count(), writes);
        assert_eq!(app.session.profile().unwrap().name, "AJAYI OLALEKAN");

        app.handle_key(KeyCode::Esc);
        assert!(matches!(app.overlay, Overlay::None));
    }
}
