pub mod avatar;

pub use avatar::AvatarPicker;
