/// Whether hub labels are drawn. Starts visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelVisibility(bool);

impl Default for LabelVisibility {
	fn default() -> Self {
		Self(true)
	}
}

impl LabelVisibility {
	pub fn is_visible(self) -> bool {
		self.0
	}

	pub fn toggle(&mut self) {
		self.0 = !self.0;
	}

	pub fn opacity(self) -> f64 {
		if self.0 { 1.0 } else { 0.0 }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_visible() {
		let labels = LabelVisibility::default();
		assert!(labels.is_visible());
		assert_eq!(labels.opacity(), 1.0);
	}

	#[test]
	fn double_toggle_restores_state() {
		let mut labels = LabelVisibility::default();
		labels.toggle();
		assert!(!labels.is_visible());
		assert_eq!(labels.opacity(), 0.0);
		labels.toggle();
		assert_eq!(labels, LabelVisibility::default());
	}
}
