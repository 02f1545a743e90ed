pub mod layout;
pub mod maze;
pub mod maze_game;
pub mod physics;
pub mod sandbox;
