//! One explicitly constructed simulation context per scene: the full Rapier
//! pipeline plus the body/collider sets, with collision events collected
//! through a channel and drained synchronously after each step.

use macroquad::color::Color;
use macroquad::shapes::{DrawRectangleParams, draw_circle, draw_rectangle_ex};
use rapier2d::crossbeam::channel::{Receiver, unbounded};
use rapier2d::prelude::*;

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    event_handler: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    contact_force_events: Receiver<ContactForceEvent>,
}

impl PhysicsWorld {
    /// A fresh world with vertical gravity `gravity_y` (0.0 for a gravity-off
    /// scene; positive y points down in screen coordinates).
    pub fn new(gravity_y: f32) -> PhysicsWorld {
        let (collision_send, collision_recv) = unbounded();
        let (contact_force_send, contact_force_recv) = unbounded();

        PhysicsWorld {
            gravity: vector![0.0, gravity_y],
            integration_params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            event_handler: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_events: collision_recv,
            contact_force_events: contact_force_recv,
        }
    }

    /// Advance the simulation one timestep and return the collision events it
    /// produced. Events are handled after the step returns, within the same
    /// tick: step, detection, drain, then whatever state mutation the caller
    /// does with them.
    pub fn step(&mut self) -> Vec<CollisionEvent> {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.event_handler,
        );

        // Contact-force events are unused; drain them so the channel never
        // grows.
        while self.contact_force_events.try_recv().is_ok() {}

        let mut events = Vec::new();
        while let Ok(event) = self.collision_events.try_recv() {
            events.push(event);
        }
        events
    }

    /// A fixed rectangular body (border, maze wall, goal pad). `width` and
    /// `height` are full extents, matching the layout rectangles.
    pub fn insert_fixed_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::fixed().translation(vector![x, y]).build();
        let collider = ColliderBuilder::cuboid(width / 2.0, height / 2.0)
            .friction(0.4)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self.bodies.insert(body);
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        (handle, collider_handle)
    }

    /// A dynamic rectangular body (sandbox boxes).
    pub fn insert_dynamic_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::dynamic().translation(vector![x, y]).build();
        let collider = ColliderBuilder::cuboid(width / 2.0, height / 2.0)
            .restitution(0.4)
            .friction(0.2)
            .build();
        let handle = self.bodies.insert(body);
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        (handle, collider_handle)
    }

    /// A dynamic ball with CCD enabled so it cannot tunnel through thin
    /// walls at high velocity.
    pub fn insert_dynamic_ball(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![x, y])
            .linvel(vector![0.0, 0.0])
            .ccd_enabled(true)
            .build();
        let collider = ColliderBuilder::ball(radius)
            .restitution(0.4)
            .friction(0.2)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self.bodies.insert(body);
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        (handle, collider_handle)
    }

    /// Replace a body with a dynamic twin at the same pose, preserving its
    /// colliders' shapes and surface properties, and return the replacement
    /// handle. The old handle is invalidated. An in-place `set_body_type` is
    /// not enough: once the world has stepped, a converted body never
    /// rejoins the island manager's active set and stays frozen unless some
    /// other body happens to collide with it.
    pub fn set_body_dynamic(&mut self, handle: RigidBodyHandle) -> RigidBodyHandle {
        let Some(old_body) = self.bodies.get(handle) else {
            return handle;
        };
        let position = *old_body.position();
        let saved: Vec<_> = old_body
            .colliders()
            .iter()
            .map(|&collider_handle| {
                let collider = &self.colliders[collider_handle];
                (
                    collider.shared_shape().clone(),
                    collider.friction(),
                    collider.restitution(),
                    collider.active_events(),
                )
            })
            .collect();

        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            true,
        );

        let body = RigidBodyBuilder::dynamic().position(position).build();
        let replacement = self.bodies.insert(body);
        for (shape, friction, restitution, events) in saved {
            let collider = ColliderBuilder::new(shape)
                .friction(friction)
                .restitution(restitution)
                .active_events(events)
                .build();
            self.colliders
                .insert_with_parent(collider, replacement, &mut self.bodies);
        }
        replacement
    }

    /// Add a velocity delta to a dynamic body.
    pub fn nudge(&mut self, handle: RigidBodyHandle, dx: f32, dy: f32) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let velocity = *body.linvel();
            body.set_linvel(vector![velocity.x + dx, velocity.y + dy], true);
        }
    }

    pub fn set_gravity_y(&mut self, gravity_y: f32) {
        self.gravity = vector![0.0, gravity_y];
    }

    /// Draw every collider at its body's translation and rotation. The scene
    /// picks the color per body, everything else is shape-driven: balls as
    /// circles, cuboids as rotated rectangles.
    pub fn draw_bodies<F>(&self, color_of: F)
    where
        F: Fn(RigidBodyHandle) -> Color,
    {
        for (handle, body) in self.bodies.iter() {
            let pos = body.translation();
            let rot = body.rotation().angle();
            let color = color_of(handle);

            for collider_handle in body.colliders() {
                let shape = self.colliders[*collider_handle].shape();

                if let Some(ball) = shape.as_ball() {
                    draw_circle(pos.x, pos.y, ball.radius, color);
                }

                if let Some(cuboid) = shape.as_cuboid() {
                    let hx = cuboid.half_extents.x;
                    let hy = cuboid.half_extents.y;
                    draw_rectangle_ex(
                        pos.x - hx,
                        pos.y - hy,
                        hx * 2.0,
                        hy * 2.0,
                        DrawRectangleParams {
                            rotation: rot,
                            color,
                            ..Default::default()
                        },
                    );
                }
            }
        }
    }
}
