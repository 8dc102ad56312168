pub mod team_card;
pub mod team_editor;

pub use team_card::TeamCard;
pub use team_editor::TeamEditor;
