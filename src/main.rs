use macroquad::miniquad::date;
use macroquad::prelude::*;

use maze_ball::modules::maze_game::MazeGame;
use maze_ball::modules::sandbox::Sandbox;

/// Set up window settings before the app runs
fn window_conf() -> Conf {
    Conf {
        window_title: "maze-ball".to_string(),
        window_width: 1024,
        window_height: 768,
        fullscreen: false,
        high_dpi: true,
        window_resizable: true,
        sample_count: 4, // MSAA
        ..Default::default()
    }
}

enum Scene {
    Menu,
    Sandbox(Sandbox),
    Maze(MazeGame),
}

fn draw_menu() {
    draw_text("maze-ball", 40.0, 80.0, 64.0, WHITE);
    draw_text("1 - shapes sandbox", 40.0, 160.0, 32.0, LIGHTGRAY);
    draw_text("2 - maze game (WASD to move, reach the green pad)", 40.0, 200.0, 32.0, LIGHTGRAY);
    draw_text("Esc - back to this menu, N - new maze", 40.0, 240.0, 32.0, LIGHTGRAY);
}

fn new_maze_game(rng: &mut ::rand::rngs::StdRng) -> Scene {
    match MazeGame::new(screen_width(), screen_height(), rng) {
        Ok(game) => Scene::Maze(game),
        // Unreachable with the fixed grid size, but don't crash the loop.
        Err(err) => {
            warn!("maze generation failed: {}", err);
            Scene::Menu
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    use ::rand::SeedableRng;

    // Seeded from the wall clock per run; tests seed their own generators.
    let mut rng = ::rand::rngs::StdRng::seed_from_u64(date::now() as u64);
    let mut scene = Scene::Menu;

    loop {
        clear_background(BLACK);

        if is_key_pressed(KeyCode::Escape) {
            scene = Scene::Menu;
        }

        let next = match &mut scene {
            Scene::Menu => {
                draw_menu();
                if is_key_pressed(KeyCode::Key1) {
                    Some(Scene::Sandbox(Sandbox::new(
                        screen_width(),
                        screen_height(),
                        &mut rng,
                    )))
                } else if is_key_pressed(KeyCode::Key2) {
                    Some(new_maze_game(&mut rng))
                } else {
                    None
                }
            }
            Scene::Sandbox(sandbox) => {
                sandbox.update(&mut rng);
                sandbox.draw();
                None
            }
            Scene::Maze(game) => {
                game.update();
                game.draw();
                // A new game is a fresh session: new matrices, new world.
                if is_key_pressed(KeyCode::N) {
                    Some(new_maze_game(&mut rng))
                } else {
                    None
                }
            }
        };
        if let Some(next) = next {
            scene = next;
        }

        next_frame().await;
    }
}
