//! A small fleet assembled from components, watched through the event bus, with route planning
//! pushed onto a background task.
//!
//! Run with `RUST_LOG=debug cargo run --example composition` to see the substrate's own logging.

use std::{sync::Arc, thread, time::Duration};

use log::info;
use rusty_substrate::{
    core::tasks::{ParallelTask, Poll},
    ecs::{
        Component, Event, World,
        event::{Change, ComponentsChanged, EntityCreated, EntityRemoved, Logger},
    },
};

// ==================== Components ====================

#[derive(Component, Debug, Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, Clone, Copy)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Component, Debug)]
struct Hull(u32);

#[derive(Component, Debug)]
struct Name(&'static str);

// ==================== Events ====================

#[derive(Event, Debug)]
struct Docked {
    ship: &'static str,
}

fn main() {
    env_logger::init();

    let mut world = World::new();

    let mut logger = Logger::new(world.events());
    logger
        .log::<EntityCreated>()
        .log::<EntityRemoved>()
        .log::<Docked>();

    let registry = Arc::clone(world.registry());
    let _changes = world
        .events()
        .subscribe_scoped(move |event: &ComponentsChanged| {
            let verb = match event.change {
                Change::Added => "gained",
                Change::Removed => "lost",
            };
            info!("{} {verb} {}", event.entity, registry.name(event.component));
        });
    let _docked = world
        .events()
        .subscribe_scoped(|event: &Docked| info!("{} is back aboard", event.ship));

    // ==================== Assemble ====================

    let carrier = world.spawn((
        Name("carrier"),
        Position { x: 0.0, y: 0.0 },
        Velocity { dx: 1.0, dy: 0.0 },
        Hull(500),
    ));
    let mut fighters = Vec::new();
    for (i, name) in ["red", "blue", "gold"].into_iter().enumerate() {
        let fighter = world.spawn((
            Name(name),
            Position {
                x: i as f32,
                y: -1.0,
            },
            Hull(40),
        ));
        world.attach_child(carrier, fighter);
        world.add_to_group(fighter, "Squadron");
        fighters.push(fighter);
    }

    // ==================== Simulate ====================

    for _ in 0..3 {
        world.for_each::<(Position, Velocity)>(|world, entity| {
            let velocity = *world.get_component::<Velocity>(entity);
            let position = world.get_component_mut::<Position>(entity);
            position.x += velocity.dx;
            position.y += velocity.dy;
        });
    }
    for ship in world.query::<(Name, Position, Hull)>() {
        let position = ship.get::<Position>();
        info!(
            "{} at ({:.1}, {:.1}) hull {}",
            ship.get::<Name>().0,
            position.x,
            position.y,
            ship.get::<Hull>().0
        );
    }

    // Gold launches: give it its own velocity and cut it loose from the carrier.
    let gold = fighters[2];
    world.add_component(gold, Velocity { dx: 0.0, dy: 2.0 });
    world.set_parent(gold, None);
    world.remove_from_group(gold, "squadron");

    // ==================== Background ====================

    let start = *world.get_component::<Position>(gold);
    let mut route = ParallelTask::named("route-planner", move |cancel| {
        let mut waypoints = Vec::new();
        let mut y = start.y;
        while y < start.y + 10.0 && !cancel.is_cancelled() {
            thread::sleep(Duration::from_millis(2));
            y += 2.5;
            waypoints.push((start.x, y));
        }
        waypoints
    });
    if let Err(err) = route.execute() {
        log::error!("route planning unavailable: {err}");
        return;
    }

    let mut frames = 0;
    let waypoints = loop {
        frames += 1;
        match route.poll() {
            Ok(Poll::Pending) => thread::sleep(Duration::from_millis(1)),
            Ok(Poll::Done(waypoints)) => break waypoints,
            Err(err) => {
                log::error!("route planning failed: {err}");
                return;
            }
        }
    };
    info!("route with {} waypoints ready after {frames} frames", waypoints.len());

    // ==================== Teardown ====================

    world.events().raise(Docked { ship: "gold" });
    world.destroy(carrier);
    let released = world.maintain();
    info!(
        "{released} slots released, {} entities remain in {:?}",
        world.len(),
        world.group("squadron")
    );
}
