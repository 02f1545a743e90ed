//! The random-shapes scene: a bordered arena full of boxes and balls
//! tumbling under gravity. Clicking spawns another random shape under the
//! cursor.

use macroquad::prelude::*;
use rapier2d::prelude::RigidBodyHandle;

use crate::modules::physics::PhysicsWorld;

const BORDER_THICKNESS: f32 = 40.0;
const GRAVITY: f32 = 800.0;
const INITIAL_SHAPES: usize = 20;
const BOX_SIDE: f32 = 50.0;
const BALL_RADIUS: f32 = 35.0;

pub struct Sandbox {
    world: PhysicsWorld,
    balls: Vec<RigidBodyHandle>,
}

impl Sandbox {
    pub fn new<R: ::rand::Rng>(width: f32, height: f32, rng: &mut R) -> Sandbox {
        let mut world = PhysicsWorld::new(GRAVITY);

        world.insert_fixed_rect(width / 2.0, 0.0, width, BORDER_THICKNESS);
        world.insert_fixed_rect(width / 2.0, height, width, BORDER_THICKNESS);
        world.insert_fixed_rect(0.0, height / 2.0, BORDER_THICKNESS, height);
        world.insert_fixed_rect(width, height / 2.0, BORDER_THICKNESS, height);

        let mut sandbox = Sandbox {
            world,
            balls: Vec::new(),
        };
        for _ in 0..INITIAL_SHAPES {
            let x = rng.gen_range(0.0..width);
            let y = rng.gen_range(0.0..height);
            sandbox.spawn_shape(x, y, rng);
        }
        sandbox
    }

    /// Coin flip between a box and a ball.
    fn spawn_shape<R: ::rand::Rng>(&mut self, x: f32, y: f32, rng: &mut R) {
        if rng.gen_bool(0.5) {
            self.world.insert_dynamic_rect(x, y, BOX_SIDE, BOX_SIDE);
        } else {
            let (ball, _) = self.world.insert_dynamic_ball(x, y, BALL_RADIUS);
            self.balls.push(ball);
        }
    }

    pub fn update<R: ::rand::Rng>(&mut self, rng: &mut R) {
        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            self.spawn_shape(x, y, rng);
        }
        self.world.step();
    }

    pub fn draw(&self) {
        self.world.draw_bodies(|handle| {
            if self.balls.contains(&handle) {
                BLUE
            } else {
                WHITE
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use ::rand::rngs::StdRng;

    #[test]
    fn starts_with_borders_and_twenty_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let sandbox = Sandbox::new(800.0, 600.0, &mut rng);
        assert_eq!(sandbox.world.bodies.len(), 4 + INITIAL_SHAPES);
    }

    #[test]
    fn stepping_keeps_the_body_count_stable() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sandbox = Sandbox::new(800.0, 600.0, &mut rng);

        for _ in 0..120 {
            sandbox.world.step();
        }
        assert_eq!(sandbox.world.bodies.len(), 4 + INITIAL_SHAPES);
    }
}
