//! Menu hot regions
//!
//! Each screen exposes a list of labelled rectangles. An activation whose
//! pointer lands inside one of them selects it. Positions are laid out
//! around the arena centre and scaled with the arena.

use glam::Vec2;

use crate::quiz::QuizQuestion;
use crate::sim::geometry::{Point, point_in_rect};
use crate::sim::state::{Arena, Screen};
use crate::users::UserBook;

/// Axis-aligned rectangle in arena pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Inclusive on every edge
    pub fn contains(&self, p: Point) -> bool {
        point_in_rect(p, self.pos, self.size)
    }

    pub fn center(&self) -> Point {
        self.pos + self.size / 2.0
    }
}

/// What a hot region does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Start,
    SelectUser,
    /// Index into the user book
    User(usize),
    NewUser,
    /// Show the next page of users
    NextPage,
    Back,
    Confirm,
    Cancel,
    /// Index into the current question's options
    Option(usize),
    Restart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: ButtonId,
    pub label: String,
    pub rect: Rect,
}

impl Button {
    fn new(id: ButtonId, label: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            label: label.into(),
            rect,
        }
    }
}

/// First button under `p`
pub fn hit_test(buttons: &[Button], p: Point) -> Option<&Button> {
    buttons.iter().find(|b| b.rect.contains(p))
}

/// User rows that fit between the title and the Back button
pub fn users_per_page(arena: &Arena) -> usize {
    // n rows end at 100 + 60n; "New user" adds 20 + 50; Back starts 80 from the bottom
    let free = arena.height - arena.px(260.0);
    ((free / arena.px(60.0)).floor().max(0.0) as usize).max(1)
}

/// Pages needed to list `count` users
pub fn user_pages(arena: &Arena, count: usize) -> usize {
    count.div_ceil(users_per_page(arena)).max(1)
}

/// Hot regions for `screen`
///
/// `user_page` selects which slice of the user list is shown; it wraps.
pub fn layout(
    screen: Screen,
    arena: &Arena,
    users: &UserBook,
    user_page: usize,
    question: Option<&QuizQuestion>,
) -> Vec<Button> {
    match screen {
        Screen::StartScreen => start_buttons(arena),
        Screen::UserSelection => user_buttons(arena, users, user_page),
        Screen::NewUser => new_user_buttons(arena),
        Screen::Playing => Vec::new(),
        Screen::RevivePrompt => question
            .map(|q| option_buttons(arena, q))
            .unwrap_or_default(),
        Screen::GameOver => game_over_buttons(arena),
    }
}

/// Rectangle horizontally offset from the centre line
fn centered(arena: &Arena, dx: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(
        arena.width / 2.0 + arena.px(dx),
        y,
        arena.px(w),
        arena.px(h),
    )
}

fn start_buttons(arena: &Arena) -> Vec<Button> {
    let mid = arena.height / 2.0;
    vec![
        Button::new(
            ButtonId::Start,
            "Start",
            centered(arena, -100.0, mid - arena.px(30.0), 200.0, 60.0),
        ),
        Button::new(
            ButtonId::SelectUser,
            "Select user",
            centered(arena, -100.0, mid + arena.px(50.0), 200.0, 60.0),
        ),
    ]
}

fn user_buttons(arena: &Arena, users: &UserBook, page: usize) -> Vec<Button> {
    let row = |i: usize| arena.px(100.0 + i as f32 * 60.0);
    let per_page = users_per_page(arena);
    let pages = user_pages(arena, users.len());
    let first = (page % pages) * per_page;

    let mut buttons: Vec<Button> = users
        .records()
        .iter()
        .enumerate()
        .skip(first)
        .take(per_page)
        .enumerate()
        .map(|(slot, (i, user))| {
            Button::new(
                ButtonId::User(i),
                user.username.clone(),
                centered(arena, -150.0, row(slot), 300.0, 50.0),
            )
        })
        .collect();

    let shown = buttons.len();
    buttons.push(Button::new(
        ButtonId::NewUser,
        "New user",
        centered(arena, -150.0, row(shown) + arena.px(20.0), 300.0, 50.0),
    ));
    let bottom = arena.height - arena.px(80.0);
    buttons.push(Button::new(
        ButtonId::Back,
        "Back",
        centered(arena, -80.0, bottom, 160.0, 50.0),
    ));
    if pages > 1 {
        buttons.push(Button::new(
            ButtonId::NextPage,
            format!("More ({}/{})", page % pages + 1, pages),
            centered(arena, 90.0, bottom, 100.0, 50.0),
        ));
    }
    buttons
}

fn new_user_buttons(arena: &Arena) -> Vec<Button> {
    let y = arena.px(190.0);
    vec![
        Button::new(
            ButtonId::Confirm,
            "Confirm",
            centered(arena, -150.0, y, 140.0, 50.0),
        ),
        Button::new(
            ButtonId::Cancel,
            "Cancel",
            centered(arena, 10.0, y, 140.0, 50.0),
        ),
    ]
}

fn option_buttons(arena: &Arena, question: &QuizQuestion) -> Vec<Button> {
    question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            Button::new(
                ButtonId::Option(i),
                option.clone(),
                centered(arena, -200.0, arena.px(200.0 + i as f32 * 60.0), 400.0, 50.0),
            )
        })
        .collect()
}

fn game_over_buttons(arena: &Arena) -> Vec<Button> {
    let mid = arena.height / 2.0;
    vec![
        Button::new(
            ButtonId::Restart,
            "Restart",
            centered(arena, -100.0, mid + arena.px(40.0), 200.0, 60.0),
        ),
        Button::new(
            ButtonId::SelectUser,
            "Select user",
            centered(arena, -100.0, mid + arena.px(120.0), 200.0, 60.0),
        ),
    ]
}
