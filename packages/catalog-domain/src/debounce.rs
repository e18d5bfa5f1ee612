use std::time::{Duration, Instant};

/// Holds raw input and releases a settled query once input has been quiet for `window`.
///
/// The debouncer owns no timer. Callers feed it instants and sleep until [`Debouncer::deadline`].
#[derive(Debug, Clone)]
pub struct Debouncer {
	window: Duration,
	raw: String,
	emitted: String,
	deadline: Option<Instant>,
}
impl Debouncer {
	pub fn new(window: Duration) -> Self {
		Self { window, raw: String::new(), emitted: String::new(), deadline: None }
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Records a raw change and restarts the quiescence window.
	pub fn input(&mut self, raw: impl Into<String>, now: Instant) {
		self.raw = raw.into();
		self.deadline = Some(now + self.window);
	}

	/// Releases the trimmed input if the window has elapsed and the value differs from the last
	/// one released.
	pub fn settle(&mut self, now: Instant) -> Option<String> {
		let deadline = self.deadline?;

		if now < deadline {
			return None;
		}

		self.deadline = None;

		let settled = self.raw.trim();

		if settled == self.emitted {
			return None;
		}

		self.emitted = settled.to_string();

		Some(self.emitted.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WINDOW: Duration = Duration::from_millis(300);

	#[test]
	fn rapid_input_releases_only_the_final_value() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(WINDOW);

		for (offset, raw) in [(0, "s"), (80, "sp"), (160, "spa"), (240, "spark")] {
			let now = start + Duration::from_millis(offset);

			debouncer.input(raw, now);

			assert_eq!(debouncer.settle(now), None);
		}

		assert_eq!(debouncer.settle(start + Duration::from_millis(539)), None);
		assert_eq!(debouncer.settle(start + Duration::from_millis(540)), Some("spark".to_string()));
		assert_eq!(debouncer.settle(start + Duration::from_millis(900)), None);
	}

	#[test]
	fn unchanged_value_is_not_released_twice() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(WINDOW);

		debouncer.input("oil ", start);

		assert_eq!(debouncer.settle(start + WINDOW), Some("oil".to_string()));

		debouncer.input(" oil", start + WINDOW);

		assert_eq!(debouncer.settle(start + WINDOW * 2), None);
		assert_eq!(debouncer.deadline(), None);
	}

	#[test]
	fn clearing_input_releases_empty_query() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(WINDOW);

		debouncer.input("4g63", start);
		debouncer.settle(start + WINDOW);
		debouncer.input("   ", start + WINDOW);

		assert_eq!(debouncer.settle(start + WINDOW * 2), Some(String::new()));
		assert_eq!(debouncer.deadline(), None);
	}
}
