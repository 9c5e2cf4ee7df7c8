use buzzer::{Buzzer, NotInQueue, ServiceQueue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Linear-time reference for the queue.
#[derive(Default)]
struct Model {
    line: VecDeque<Buzzer>,
    retired: Vec<Buzzer>,
    issued: usize,
}

impl Model {
    fn give_buzzer(&mut self) -> Buzzer {
        let b = self.retired.pop().unwrap_or_else(|| {
            self.issued += 1;
            self.issued - 1
        });
        self.line.push_back(b);
        b
    }

    fn seat(&mut self) -> Option<Buzzer> {
        let b = self.line.pop_front()?;
        self.retired.push(b);
        Some(b)
    }

    fn position(&self, b: Buzzer) -> Result<usize, NotInQueue> {
        self.line.iter().position(|&x| x == b).ok_or(NotInQueue(b))
    }

    fn kick_out(&mut self, b: Buzzer) -> Result<(), NotInQueue> {
        let at = self.position(b)?;
        self.line.remove(at);
        self.retired.push(b);
        Ok(())
    }

    fn take_bribe(&mut self, b: Buzzer) -> Result<(), NotInQueue> {
        let at = self.position(b)?;
        self.line.remove(at);
        self.line.push_front(b);
        Ok(())
    }
}

fn run_against_model(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut queue = ServiceQueue::new();
    let mut model = Model::default();

    for step in 0..steps {
        let target = rng.gen_range(0, model.issued + 2);
        match rng.gen_range(0, 10) {
            0..=3 => assert_eq!(queue.give_buzzer(), model.give_buzzer(), "step {}", step),
            4..=5 => assert_eq!(queue.seat(), model.seat(), "step {}", step),
            6..=7 => assert_eq!(
                queue.kick_out(target),
                model.kick_out(target),
                "step {}",
                step
            ),
            _ => assert_eq!(
                queue.take_bribe(target),
                model.take_bribe(target),
                "step {}",
                step
            ),
        }

        assert_eq!(queue.len(), model.line.len(), "step {}", step);
        assert_eq!(
            queue.snapshot(),
            model.line.iter().copied().collect::<Vec<_>>(),
            "step {}",
            step
        );
        assert_eq!(queue.issued(), model.issued, "step {}", step);
    }
}

#[test]
fn matches_model_on_random_operations() {
    for seed in 0..20 {
        run_against_model(seed, 2_000);
    }
}

#[test]
fn dense_until_first_retirement() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut queue = ServiceQueue::new();
    let n = rng.gen_range(1, 500);
    for expected in 0..n {
        assert_eq!(queue.give_buzzer(), expected);
    }
    assert_eq!(queue.snapshot(), (0..n).collect::<Vec<_>>());
}

#[test]
fn bribes_keep_everyone_else_in_order() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut queue = ServiceQueue::new();
    for _ in 0..64 {
        queue.give_buzzer();
    }

    for _ in 0..200 {
        let before = queue.snapshot();
        let b = before[rng.gen_range(0, before.len())];
        assert_eq!(queue.take_bribe(b), Ok(()));

        let after = queue.snapshot();
        assert_eq!(after[0], b);
        let rest: Vec<_> = before.into_iter().filter(|&x| x != b).collect();
        assert_eq!(&after[1..], &rest[..]);
    }
}
