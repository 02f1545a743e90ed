//! The maze scene: a ball steered with WASD through a generated perfect
//! maze toward a goal pad in the bottom-right cell. Reaching the goal turns
//! gravity on and drops every maze wall as a dynamic body.

use macroquad::prelude::*;
use rapier2d::prelude::{CollisionEvent, ColliderHandle, RigidBodyHandle};

use crate::modules::layout::{CellMetrics, wall_rects};
use crate::modules::maze::{self, MazeError};
use crate::modules::physics::PhysicsWorld;

pub const ROWS: usize = 8;
pub const COLUMNS: usize = 10;

const WALL_THICKNESS: f32 = 10.0;
const BORDER_THICKNESS: f32 = 10.0;
const BALL_SPEED: f32 = 300.0;
const WIN_GRAVITY: f32 = 800.0;

pub struct MazeGame {
    world: PhysicsWorld,
    ball: RigidBodyHandle,
    ball_collider: ColliderHandle,
    goal: RigidBodyHandle,
    goal_collider: ColliderHandle,
    walls: Vec<RigidBodyHandle>,
    won: bool,
}

impl MazeGame {
    /// Build a complete session: generate the maze first, then materialize
    /// it. The matrices are fully determined before any body exists and are
    /// dropped once the walls are built; a new game constructs a whole new
    /// `MazeGame` rather than mutating this one.
    pub fn new<R: ::rand::Rng>(
        width: f32,
        height: f32,
        rng: &mut R,
    ) -> Result<MazeGame, MazeError> {
        let maze = maze::generate(ROWS, COLUMNS, rng)?;
        let metrics = CellMetrics::new(width, height, ROWS, COLUMNS);

        // Gravity stays off until the win celebration.
        let mut world = PhysicsWorld::new(0.0);

        // Arena borders.
        world.insert_fixed_rect(width / 2.0, 0.0, width, BORDER_THICKNESS);
        world.insert_fixed_rect(width / 2.0, height, width, BORDER_THICKNESS);
        world.insert_fixed_rect(0.0, height / 2.0, BORDER_THICKNESS, height);
        world.insert_fixed_rect(width, height / 2.0, BORDER_THICKNESS, height);

        let walls = wall_rects(&maze, &metrics, WALL_THICKNESS)
            .into_iter()
            .map(|rect| world.insert_fixed_rect(rect.x, rect.y, rect.width, rect.height).0)
            .collect();

        let (goal_x, goal_y) = metrics.cell_center(ROWS - 1, COLUMNS - 1);
        let (goal, goal_collider) = world.insert_fixed_rect(
            goal_x,
            goal_y,
            0.7 * metrics.unit_width,
            0.7 * metrics.unit_height,
        );

        let (ball_x, ball_y) = metrics.cell_center(0, 0);
        let radius = metrics.unit_width.min(metrics.unit_height) / 4.0;
        let (ball, ball_collider) = world.insert_dynamic_ball(ball_x, ball_y, radius);

        Ok(MazeGame {
            world,
            ball,
            ball_collider,
            goal,
            goal_collider,
            walls,
            won: false,
        })
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn update(&mut self) {
        self.handle_input();

        for event in self.world.step() {
            if let CollisionEvent::Started(a, b, _) = event {
                if self.is_ball_goal_pair(a, b) && !self.won {
                    self.celebrate_win();
                }
            }
        }
    }

    // Discrete key presses map to velocity deltas, one per press.
    fn handle_input(&mut self) {
        if is_key_pressed(KeyCode::W) || is_key_pressed(KeyCode::Up) {
            info!("move up");
            self.world.nudge(self.ball, 0.0, -BALL_SPEED);
        }
        if is_key_pressed(KeyCode::D) || is_key_pressed(KeyCode::Right) {
            info!("move right");
            self.world.nudge(self.ball, BALL_SPEED, 0.0);
        }
        if is_key_pressed(KeyCode::S) || is_key_pressed(KeyCode::Down) {
            info!("move down");
            self.world.nudge(self.ball, 0.0, BALL_SPEED);
        }
        if is_key_pressed(KeyCode::A) || is_key_pressed(KeyCode::Left) {
            info!("move left");
            self.world.nudge(self.ball, -BALL_SPEED, 0.0);
        }
    }

    fn is_ball_goal_pair(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        (a == self.ball_collider && b == self.goal_collider)
            || (a == self.goal_collider && b == self.ball_collider)
    }

    // Physics step, collision detection, then this mutation, all inside the
    // same simulation tick.
    fn celebrate_win(&mut self) {
        info!("goal reached, dropping the walls");
        self.won = true;
        self.world.set_gravity_y(WIN_GRAVITY);
        // Conversion replaces each body, so keep the stored handles in sync.
        for wall in &mut self.walls {
            *wall = self.world.set_body_dynamic(*wall);
        }
    }

    pub fn draw(&self) {
        self.world.draw_bodies(|handle| {
            if handle == self.ball {
                SKYBLUE
            } else if handle == self.goal {
                GREEN
            } else if self.walls.contains(&handle) {
                RED
            } else {
                GRAY
            }
        });

        if self.won {
            let text = "You won!";
            let size = 80.0;
            let dims = measure_text(text, None, size as u16, 1.0);
            draw_text(
                text,
                screen_width() / 2.0 - dims.width / 2.0,
                screen_height() / 2.0,
                size,
                WHITE,
            );
            draw_text("press N for a new maze", 20.0, 30.0, 24.0, LIGHTGRAY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use ::rand::rngs::StdRng;

    #[test]
    fn a_session_builds_walls_borders_ball_and_goal() {
        let mut rng = StdRng::seed_from_u64(5);
        let game = MazeGame::new(1000.0, 800.0, &mut rng).unwrap();

        // A perfect 8x10 maze opens 79 of the 142 internal wall slots.
        let slots = (ROWS - 1) * COLUMNS + ROWS * (COLUMNS - 1);
        assert_eq!(game.walls.len(), slots - (ROWS * COLUMNS - 1));

        // 4 borders + walls + goal + ball.
        assert_eq!(game.world.bodies.len(), 4 + game.walls.len() + 2);
        assert!(!game.won());
    }

    #[test]
    fn win_drops_every_wall() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = MazeGame::new(1000.0, 800.0, &mut rng).unwrap();

        // The win always lands mid-session, long after the first tick.
        for _ in 0..60 {
            game.world.step();
        }

        game.celebrate_win();
        assert!(game.won());
        for &wall in &game.walls {
            assert!(game.world.bodies[wall].is_dynamic());
        }

        // With gravity on, dropped walls actually move.
        let before = game.world.bodies[game.walls[0]].translation().y;
        for _ in 0..30 {
            game.world.step();
        }
        let after = game.world.bodies[game.walls[0]].translation().y;
        assert!(after > before);
    }
}
