pub mod countdown;
pub mod dealer;
pub mod entity;
pub mod game_state;
pub mod input;
pub mod player;
pub mod presenter;
pub mod rules;
pub mod shutdown;
pub mod table;
