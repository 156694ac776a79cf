use goudvink::input::Game;

fn main() {
    env_logger::init();
    Game::main_loop();
}
