use std::f32::consts::PI;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Half of the angular fan the two children of a branch are spread over.
pub const BASE_SPREAD: f32 = PI / 5.0;
/// Bound of the random perturbation added to each child's base angle.
pub const ANGLE_JITTER: f32 = 0.15;
/// Probability that a branch carries a flower once its foliage is attached.
pub const FLOWER_CHANCE: f64 = 0.75;
/// Child length ratio range, drawn per branch.
pub const LENGTH_MULTIPLIER_MIN: f32 = 0.64;
pub const LENGTH_MULTIPLIER_MAX: f32 = 0.80;
/// Child thickness is the parent's thickness times this ratio.
pub const THICKNESS_RATIO: f32 = 0.7;
/// Trunk thickness as a fraction of trunk length.
pub const TRUNK_THICKNESS_RATIO: f32 = 0.09;

/// One node of an immutable binary branch tree.
///
/// `children` is empty exactly when `depth == max_depth` of the tree it
/// was built for; otherwise it holds two branches, each of length
/// `length * length_multiplier`.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub length: f32,
    pub thickness: f32,
    pub depth: u32,
    pub angle_offset: f32,
    pub children: Vec<Branch>,
    pub noise_threshold: f32,
    pub has_flower: bool,
    pub length_multiplier: f32,
}

impl Branch {
    /// Number of branches in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Branch::node_count).sum::<usize>()
    }

    /// Depth-first, pre-order iterator over this subtree.
    pub fn iter(&self) -> impl Iterator<Item = &Branch> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let b = stack.pop()?;
            // Push in reverse so the first child is visited first.
            stack.extend(b.children.iter().rev());
            Some(b)
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

/// Width breakpoints that pick the trunk proportions for a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportClass {
    Compact,
    Medium,
    Wide,
}

impl ViewportClass {
    pub fn for_size(size: Vec2) -> Self {
        if size.x < 600.0 {
            ViewportClass::Compact
        } else if size.x < 1024.0 {
            ViewportClass::Medium
        } else {
            ViewportClass::Wide
        }
    }

    /// Trunk length as a fraction of viewport height.
    fn trunk_ratio(self) -> f32 {
        match self {
            ViewportClass::Compact => 0.20,
            ViewportClass::Medium => 0.24,
            ViewportClass::Wide => 0.27,
        }
    }
}

/// Trunk length and thickness for an unscaled tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrunkSize {
    pub length: f32,
    pub thickness: f32,
}

impl TrunkSize {
    pub fn for_viewport(size: Vec2) -> Self {
        let length = size.y.max(1.0) * ViewportClass::for_size(size).trunk_ratio();
        Self {
            length,
            thickness: length * TRUNK_THICKNESS_RATIO,
        }
    }
}

/// Seed-deterministic builder of fractal branch trees.
///
/// The generator owns its random stream and reseeds it on every
/// [`SkeletonGenerator::build`], so the same `(seed, max_depth, trunk)`
/// always yields an identical tree.
#[derive(Debug)]
pub struct SkeletonGenerator {
    rng: StdRng,
}

impl Default for SkeletonGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Builds a complete binary tree with `2^(max_depth + 1) - 1` branches.
    ///
    /// ### Parameters
    /// - `seed` - Seed for the random stream; reset before generation.
    /// - `max_depth` - Depth of the terminal twigs (the trunk is depth `0`).
    /// - `trunk` - Unscaled trunk length and thickness.
    ///
    /// ### Returns
    /// The trunk [`Branch`], owning the whole tree.
    pub fn build(&mut self, seed: u64, max_depth: u32, trunk: TrunkSize) -> Branch {
        self.rng = StdRng::seed_from_u64(seed);
        self.grow(0, max_depth, 0.0, trunk.length, trunk.thickness)
    }

    fn grow(
        &mut self,
        depth: u32,
        max_depth: u32,
        angle_offset: f32,
        length: f32,
        thickness: f32,
    ) -> Branch {
        let noise_threshold: f32 = self.rng.random();
        let has_flower = self.rng.random_bool(FLOWER_CHANCE);
        let length_multiplier = self
            .rng
            .random_range(LENGTH_MULTIPLIER_MIN..=LENGTH_MULTIPLIER_MAX);

        let mut children = Vec::new();
        if depth < max_depth {
            children.reserve_exact(2);
            // Split [-BASE_SPREAD, BASE_SPREAD] evenly between the two children.
            for i in 0..2 {
                let base = -BASE_SPREAD + (i as f32) * 2.0 * BASE_SPREAD;
                let jitter = self.rng.random_range(-ANGLE_JITTER..=ANGLE_JITTER);
                children.push(self.grow(
                    depth + 1,
                    max_depth,
                    base + jitter,
                    length * length_multiplier,
                    thickness * THICKNESS_RATIO,
                ));
            }
        }

        Branch {
            length,
            thickness,
            depth,
            angle_offset,
            children,
            noise_threshold,
            has_flower,
            length_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trunk() -> TrunkSize {
        TrunkSize::for_viewport(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn build_is_deterministic_for_same_seed() {
        let mut generator = SkeletonGenerator::new();
        let a = generator.build(42, 6, trunk());
        // Build something else in between to disturb the stream.
        let _ = generator.build(7, 3, trunk());
        let b = generator.build(42, 6, trunk());

        assert_eq!(a.node_count(), (1 << 7) - 1);
        assert_eq!(a, b, "same seed and depth must give the same tree");
    }

    #[test]
    fn different_seeds_give_different_trees() {
        let mut generator = SkeletonGenerator::new();
        let a = generator.build(1, 5, trunk());
        let b = generator.build(2, 5, trunk());

        assert_eq!(a.node_count(), b.node_count());
        assert_ne!(a, b);
    }

    #[test]
    fn children_exist_exactly_below_max_depth() {
        let max_depth = 5;
        let root = SkeletonGenerator::new().build(3, max_depth, trunk());

        for b in root.iter() {
            if b.depth == max_depth {
                assert!(b.children.is_empty());
            } else {
                assert_eq!(b.children.len(), 2);
                for c in &b.children {
                    assert_eq!(c.depth, b.depth + 1);
                }
            }
        }
    }

    #[test]
    fn fields_stay_within_their_ranges() {
        let root = SkeletonGenerator::new().build(11, 7, trunk());
        assert_eq!(root.angle_offset, 0.0);

        for b in root.iter() {
            assert!((0.0..1.0).contains(&b.noise_threshold));
            assert!(
                (LENGTH_MULTIPLIER_MIN..=LENGTH_MULTIPLIER_MAX).contains(&b.length_multiplier)
            );

            for (i, c) in b.children.iter().enumerate() {
                // First child leans left, second leans right.
                let base = if i == 0 { -BASE_SPREAD } else { BASE_SPREAD };
                assert!((c.angle_offset - base).abs() <= ANGLE_JITTER + 1e-6);

                assert!((c.length - b.length * b.length_multiplier).abs() < 1e-4);
                assert!((c.thickness - b.thickness * THICKNESS_RATIO).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn roughly_three_quarters_carry_flowers() {
        let root = SkeletonGenerator::new().build(5, 10, trunk());
        let total = root.node_count() as f32;
        let flowered = root.iter().filter(|b| b.has_flower).count() as f32;

        let frac = flowered / total;
        assert!((0.70..0.80).contains(&frac), "flower fraction was {frac}");
    }

    #[test]
    fn trunk_grows_with_viewport_class() {
        let compact = TrunkSize::for_viewport(Vec2::new(400.0, 800.0));
        let wide = TrunkSize::for_viewport(Vec2::new(1600.0, 800.0));

        assert_eq!(ViewportClass::for_size(Vec2::new(400.0, 800.0)), ViewportClass::Compact);
        assert_eq!(ViewportClass::for_size(Vec2::new(800.0, 800.0)), ViewportClass::Medium);
        assert!(wide.length > compact.length);
        assert!((compact.thickness - compact.length * TRUNK_THICKNESS_RATIO).abs() < 1e-4);
    }
}
