use crate::games::SessionRng;
use crate::log;
use super::food::{Food, FoodPlacement, FoodPlacer};
use super::settings::GameSettings;
use super::snake::Snake;
use super::types::{CollisionKind, Direction, Phase, Position, TickResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub final_score: u32,
    pub final_length: usize,
    pub ticks: u64,
    pub reason: CollisionKind,
}

#[derive(Clone, Debug)]
pub struct GameState {
    settings: GameSettings,
    snake: Snake,
    food: Food,
    direction: Direction,
    last_moved: Direction,
    score: u32,
    phase: Phase,
    final_score: Option<u32>,
    ticks: u64,
}

impl GameState {
    pub fn new(settings: GameSettings) -> Self {
        let snake = Snake::canonical(&settings.grid, settings.initial_snake_length);
        Self {
            settings,
            snake,
            food: Food::inactive(),
            direction: Direction::Right,
            last_moved: Direction::Right,
            score: 0,
            phase: Phase::Ready,
            final_score: None,
            ticks: 0,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Food {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Score of the most recently finished round.
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Starts a round from `Ready` or `Over`. Returns false if one is already running.
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Running {
            return false;
        }
        self.reset_board();
        self.phase = Phase::Running;
        log!(
            "Round started, head at {}, length {}",
            self.snake.head(),
            self.snake.len()
        );
        true
    }

    /// `Over` -> `Ready`.
    pub fn acknowledge(&mut self) {
        if self.phase == Phase::Over {
            self.phase = Phase::Ready;
        }
    }

    /// Ends the running round and eagerly resets the board for the next one.
    /// The phase stays `Over` until the round is acknowledged or restarted.
    pub fn end_round(&mut self, reason: CollisionKind) -> RoundSummary {
        let summary = RoundSummary {
            final_score: self.score,
            final_length: self.snake.len(),
            ticks: self.ticks,
            reason,
        };
        log!(
            "Round over ({}): score {}, length {}, {} ticks",
            reason,
            summary.final_score,
            summary.final_length,
            summary.ticks
        );

        self.phase = Phase::Over;
        self.final_score = Some(summary.final_score);
        self.reset_board();
        summary
    }

    fn reset_board(&mut self) {
        self.snake = Snake::canonical(&self.settings.grid, self.settings.initial_snake_length);
        self.food = Food::inactive();
        self.direction = Direction::Right;
        self.last_moved = Direction::Right;
        self.score = 0;
        self.ticks = 0;
    }

    /// Applies a turn unless it would reverse the snake into its neck.
    /// Returns whether the direction was accepted.
    pub fn request_direction_change(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(&self.direction) || direction.is_opposite(&self.last_moved) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Unrecognized symbols are ignored.
    pub fn request_direction_symbol(&mut self, symbol: &str) -> bool {
        match symbol.parse::<Direction>() {
            Ok(direction) => self.request_direction_change(direction),
            Err(_) => false,
        }
    }

    pub fn ensure_food(&mut self, rng: &mut SessionRng) -> FoodPlacement {
        if self.food.active {
            return FoodPlacement::AlreadyActive;
        }

        let placer = FoodPlacer {
            max_attempts: self.settings.max_food_attempts,
            free_cell_sampling_threshold: self.settings.free_cell_sampling_threshold,
        };
        let placement = placer.place(&self.settings.grid, &self.snake, rng);

        match placement {
            FoodPlacement::Placed(pos) | FoodPlacement::PlacedFromFreeCells(pos) => {
                self.food = Food {
                    coordinates: Some(pos),
                    active: true,
                };
            }
            FoodPlacement::NoFreeCell => {
                log!("No free cell left for food");
            }
            FoodPlacement::AlreadyActive => {}
        }

        placement
    }

    pub fn tick(&mut self, rng: &mut SessionRng) -> TickResult {
        if self.phase != Phase::Running {
            return TickResult::Idle;
        }

        let new_head = self
            .snake
            .next_head(self.direction, self.settings.grid.cell_size());
        self.snake.push_head(new_head);
        self.last_moved = self.direction;
        self.ticks += 1;

        let ate_food = self.food.is_at(new_head);
        if ate_food {
            self.score = self.score.saturating_add(self.settings.score_reward);
            self.food.active = false;
            log!("Food eaten at {}. Score: {}", new_head, self.score);
        } else {
            self.snake.drop_tail();
        }

        // eaten food stays inactive until the next tick places a new one
        if !ate_food {
            self.ensure_food(rng);
        }

        match self.collision_kind() {
            Some(kind) => TickResult::Collided(kind),
            None => TickResult::Continued,
        }
    }

    pub fn detect_collision(&self) -> bool {
        self.collision_kind().is_some()
    }

    pub fn collision_kind(&self) -> Option<CollisionKind> {
        if !self.settings.grid.contains(self.snake.head()) {
            return Some(CollisionKind::Wall);
        }
        if self.snake.head_hits_body(1) {
            return Some(CollisionKind::SelfCollision);
        }
        None
    }

    pub fn is_free(&self, pos: Position) -> bool {
        self.settings.grid.contains(pos) && !self.snake.contains(pos)
    }

    #[cfg(test)]
    pub(crate) fn set_running_layout(&mut self, segments: &[Position], direction: Direction) {
        self.snake = Snake::from_segments(segments.iter().copied());
        self.direction = direction;
        self.last_moved = direction;
        self.phase = Phase::Running;
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Food) {
        self.food = food;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn scenario_snake() -> Vec<Position> {
        vec![p(300, 300), p(270, 300), p(240, 300), p(210, 300), p(180, 300)]
    }

    fn create_state() -> (GameState, SessionRng) {
        (GameState::new(GameSettings::default()), SessionRng::new(42))
    }

    fn segments(state: &GameState) -> Vec<Position> {
        state.snake().segments().copied().collect()
    }

    fn assert_contiguous(state: &GameState) {
        let body = segments(state);
        for pair in body.windows(2) {
            let distance = (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs();
            assert_eq!(distance, 30, "segments {} and {} are not adjacent in {:?}", pair[0], pair[1], body);
        }
    }

    fn assert_no_overlap(state: &GameState) {
        let body = segments(state);
        for (i, a) in body.iter().enumerate() {
            for b in body.iter().skip(i + 1) {
                assert_ne!(a, b, "segments overlap in {:?}", body);
            }
        }
    }

    #[test]
    fn test_new_state_is_ready() {
        let (state, _) = create_state();
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.snake().len(), 5);
        assert_eq!(state.score(), 0);
        assert_eq!(state.direction(), Direction::Right);
        assert!(!state.food().active);
    }

    #[test]
    fn test_tick_before_start_is_idle() {
        let (mut state, mut rng) = create_state();
        let before = segments(&state);
        assert_eq!(state.tick(&mut rng), TickResult::Idle);
        assert_eq!(segments(&state), before);
        assert!(!state.food().active);
    }

    #[test]
    fn test_tick_moves_without_growing() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(&scenario_snake(), Direction::Right);

        assert_eq!(state.tick(&mut rng), TickResult::Continued);
        assert_eq!(
            segments(&state),
            vec![p(330, 300), p(300, 300), p(270, 300), p(240, 300), p(210, 300)]
        );
        assert_eq!(state.score(), 0);
        assert!(state.food().active);
    }

    #[test]
    fn test_tick_eats_food_and_grows() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(&scenario_snake(), Direction::Right);
        state.set_food(Food {
            coordinates: Some(p(330, 300)),
            active: true,
        });

        assert_eq!(state.tick(&mut rng), TickResult::Continued);
        assert_eq!(state.snake().head(), p(330, 300));
        assert_eq!(state.snake().len(), 6);
        assert_eq!(state.score(), 10);
        assert!(!state.food().active);

        assert_eq!(state.tick(&mut rng), TickResult::Continued);
        let food = state.food().active_position().expect("food placed on the following tick");
        assert!(!state.snake().contains(food));
    }

    #[test]
    fn test_score_saturates_instead_of_overflowing() {
        let settings = GameSettings {
            score_reward: u32::MAX,
            ..GameSettings::default()
        };
        let mut state = GameState::new(settings);
        let mut rng = SessionRng::new(42);
        state.set_running_layout(&scenario_snake(), Direction::Right);

        for x in [330, 360] {
            state.set_food(Food {
                coordinates: Some(p(x, 300)),
                active: true,
            });
            assert_eq!(state.tick(&mut rng), TickResult::Continued);
        }
        assert_eq!(state.score(), u32::MAX);
        assert_eq!(state.snake().len(), 7);
    }

    #[test]
    fn test_inactive_food_is_not_eaten() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(&scenario_snake(), Direction::Right);
        state.set_food(Food {
            coordinates: Some(p(330, 300)),
            active: false,
        });

        state.tick(&mut rng);
        assert_eq!(state.snake().len(), 5);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_left_edge_is_wall_collision() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(
            &[p(0, 300), p(30, 300), p(60, 300), p(90, 300), p(120, 300)],
            Direction::Left,
        );

        assert_eq!(state.tick(&mut rng), TickResult::Collided(CollisionKind::Wall));
        assert_eq!(state.snake().head(), p(-30, 300));
        assert!(state.detect_collision());
    }

    #[test]
    fn test_far_edges_are_wall_collisions() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(&[p(570, 0), p(540, 0)], Direction::Right);
        assert_eq!(state.tick(&mut rng), TickResult::Collided(CollisionKind::Wall));

        state.set_running_layout(&[p(0, 570), p(0, 540)], Direction::Down);
        assert_eq!(state.tick(&mut rng), TickResult::Collided(CollisionKind::Wall));

        state.set_running_layout(&[p(0, 0), p(0, 30)], Direction::Up);
        assert_eq!(state.tick(&mut rng), TickResult::Collided(CollisionKind::Wall));
    }

    #[test]
    fn test_head_on_segment_index_five_is_self_collision() {
        let (mut state, _) = create_state();
        state.set_running_layout(
            &[p(60, 30), p(60, 60), p(30, 60), p(30, 30), p(30, 0), p(60, 30)],
            Direction::Up,
        );
        assert!(state.detect_collision());
        assert_eq!(state.collision_kind(), Some(CollisionKind::SelfCollision));
    }

    #[test]
    fn test_turning_into_body_collides() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(
            &[p(30, 30), p(60, 30), p(60, 60), p(30, 60), p(0, 60)],
            Direction::Left,
        );
        assert!(state.request_direction_change(Direction::Down));

        assert_eq!(
            state.tick(&mut rng),
            TickResult::Collided(CollisionKind::SelfCollision)
        );
    }

    #[test]
    fn test_following_own_tail_is_not_a_collision() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(&[p(30, 30), p(60, 30), p(60, 60), p(30, 60)], Direction::Left);
        state.set_food(Food {
            coordinates: Some(p(300, 300)),
            active: true,
        });
        assert!(state.request_direction_change(Direction::Down));

        assert_eq!(state.tick(&mut rng), TickResult::Continued);
        assert_eq!(state.snake().head(), p(30, 60));
        assert_no_overlap(&state);
    }

    #[test]
    fn test_reversal_is_rejected() {
        let (mut state, _) = create_state();
        assert!(state.start());
        for direction in Direction::ALL {
            let current = state.direction();
            assert!(!state.request_direction_change(current.opposite()));
            assert_eq!(state.direction(), current);
            state.request_direction_change(direction);
        }
    }

    #[test]
    fn test_two_turns_within_one_tick_cannot_reverse() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(&scenario_snake(), Direction::Right);

        assert!(state.request_direction_change(Direction::Up));
        assert!(!state.request_direction_change(Direction::Left));
        assert_eq!(state.direction(), Direction::Up);

        assert_eq!(state.tick(&mut rng), TickResult::Continued);
        assert!(state.request_direction_change(Direction::Left));
    }

    #[test]
    fn test_unknown_symbol_is_ignored() {
        let (mut state, _) = create_state();
        assert!(!state.request_direction_symbol("space"));
        assert_eq!(state.direction(), Direction::Right);
        assert!(state.request_direction_symbol("w"));
        assert_eq!(state.direction(), Direction::Up);
    }

    #[test]
    fn test_ensure_food_is_idempotent_while_active() {
        let (mut state, mut rng) = create_state();
        state.start();

        let first = state.ensure_food(&mut rng);
        let placed = state.food().coordinates;
        assert!(matches!(first, FoodPlacement::Placed(_)));

        assert_eq!(state.ensure_food(&mut rng), FoodPlacement::AlreadyActive);
        assert_eq!(state.food().coordinates, placed);
    }

    #[test]
    fn test_invariants_hold_over_long_run() {
        let (mut state, mut rng) = create_state();
        state.start();

        for step in 0..2000 {
            let len_before = state.snake().len();
            let score_before = state.score();
            let food_before = state.food().active_position();

            let turn = Direction::ALL[step % 4];
            if state.is_free(state.snake().next_head(turn, 30)) {
                state.request_direction_change(turn);
            }
            let next = state.snake().next_head(state.direction(), 30);

            match state.tick(&mut rng) {
                TickResult::Continued => {
                    let ate = food_before == Some(next);
                    let expected = if ate { len_before + 1 } else { len_before };
                    assert_eq!(state.snake().len(), expected);
                    assert_eq!(state.score(), score_before + if ate { 10 } else { 0 });
                    assert_no_overlap(&state);
                    assert_contiguous(&state);
                    if let Some(food) = state.food().active_position() {
                        assert!(!state.snake().contains(food));
                    }
                }
                TickResult::Collided(kind) => {
                    state.end_round(kind);
                    state.start();
                }
                TickResult::Idle => panic!("round should be running"),
            }
        }
    }

    #[test]
    fn test_end_round_records_score_and_resets() {
        let (mut state, mut rng) = create_state();
        state.set_running_layout(&scenario_snake(), Direction::Right);
        state.set_food(Food {
            coordinates: Some(p(330, 300)),
            active: true,
        });
        state.tick(&mut rng);

        let summary = state.end_round(CollisionKind::Wall);
        assert_eq!(summary.final_score, 10);
        assert_eq!(summary.final_length, 6);
        assert_eq!(summary.ticks, 1);
        assert_eq!(state.phase(), Phase::Over);
        assert_eq!(state.final_score(), Some(10));
        assert_eq!(state.score(), 0);
        assert_eq!(state.snake().len(), 5);
        assert_eq!(state.direction(), Direction::Right);
        assert!(!state.food().active);

        assert_eq!(state.tick(&mut rng), TickResult::Idle);
        state.acknowledge();
        assert_eq!(state.phase(), Phase::Ready);
    }

    #[test]
    fn test_start_only_from_idle_phases() {
        let (mut state, _) = create_state();
        assert!(state.start());
        assert!(!state.start());
        state.end_round(CollisionKind::SelfCollision);
        assert!(state.start());
        assert_eq!(state.phase(), Phase::Running);
    }
}
