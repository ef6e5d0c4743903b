pub mod drive_item;
pub mod provision;
pub mod surveyor;
