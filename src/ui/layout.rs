//! Stack layout for dialog content
//!
//! A stack places its children one after another along its axis. Along
//! that axis each child is either a fixed number of cells or a weighted
//! share of the space the fixed children leave over. Across the axis a
//! child takes its fixed size or, when flexible, the whole stack.

/// Represents a rectangular region (1-based screen coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, row: u16, col: u16) -> bool {
        (self.y..self.y.saturating_add(self.height)).contains(&row)
            && (self.x..self.x.saturating_add(self.width)).contains(&col)
    }

    /// Center a rectangle of the given size inside this one
    pub fn centered(&self, width: u16, height: u16) -> Rect {
        let width = width.min(self.width);
        let height = height.min(self.height);
        Rect {
            x: self.x + (self.width - width) / 2,
            y: self.y + (self.height - height) / 2,
            width,
            height,
        }
    }

    /// Shrink by a margin on every side
    pub fn inset(&self, margin: u16) -> Rect {
        Rect {
            x: self.x + margin,
            y: self.y + margin,
            width: self.width.saturating_sub(margin * 2),
            height: self.height.saturating_sub(margin * 2),
        }
    }
}

/// Size constraint along one axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    /// Exactly this many cells
    Fixed(u16),
    /// Share of the leftover space, by weight
    Flex(u16),
}

/// Preferred size reported by a widget to the layout engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeHint {
    pub min_width: u16,
    pub min_height: u16,
    /// Vertical flex weight; 0 means the widget keeps its minimum height
    pub flex: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Children of a stack item and how they are spaced
#[derive(Clone, Debug)]
pub struct Stack {
    pub axis: Axis,
    pub children: Vec<LayoutItem>,
    pub spacing: u16,
    pub padding: u16,
}

/// Size constraints of one item, plus its children if it is a stack
#[derive(Clone, Debug)]
pub struct LayoutItem {
    pub width: Size,
    pub height: Size,
    pub min_width: u16,
    pub min_height: u16,
    pub stack: Option<Stack>,
}

impl LayoutItem {
    /// A single-row item that stretches horizontally
    pub fn leaf() -> Self {
        Self {
            width: Size::Flex(1),
            height: Size::Fixed(1),
            min_width: 0,
            min_height: 0,
            stack: None,
        }
    }

    /// A stack that fills whatever it is given
    pub fn stack(axis: Axis, children: Vec<LayoutItem>) -> Self {
        Self {
            width: Size::Flex(1),
            height: Size::Flex(1),
            min_width: 0,
            min_height: 0,
            stack: Some(Stack { axis, children, spacing: 0, padding: 0 }),
        }
    }

    pub fn fixed_height(mut self, h: u16) -> Self {
        self.height = Size::Fixed(h);
        self
    }

    pub fn spacing(mut self, spacing: u16) -> Self {
        if let Some(stack) = self.stack.as_mut() {
            stack.spacing = spacing;
        }
        self
    }

    pub fn padding(mut self, padding: u16) -> Self {
        if let Some(stack) = self.stack.as_mut() {
            stack.padding = padding;
        }
        self
    }

    /// Height this item needs when laid out in a vertical stack
    pub fn natural_height(&self) -> u16 {
        let Some(stack) = &self.stack else {
            return match self.height {
                Size::Fixed(h) => h.max(self.min_height),
                Size::Flex(_) => self.min_height.max(1),
            };
        };

        let heights = stack.children.iter().map(LayoutItem::natural_height);
        let content = match stack.axis {
            Axis::Vertical => heights.sum::<u16>() + gaps(stack.children.len(), stack.spacing),
            Axis::Horizontal => heights.max().unwrap_or(0),
        };
        content + stack.padding * 2
    }

    /// Constraint and minimum along `axis`
    fn along(&self, axis: Axis) -> (Size, u16) {
        match axis {
            Axis::Vertical => (self.height, self.min_height),
            Axis::Horizontal => (self.width, self.min_width),
        }
    }
}

fn gaps(count: usize, spacing: u16) -> u16 {
    spacing * (count as u16).saturating_sub(1)
}

/// Compute the bounds of each direct child of a stack item
///
/// Leaves have no children and yield an empty list.
pub fn compute_child_bounds(item: &LayoutItem, bounds: Rect) -> Vec<Rect> {
    let Some(stack) = &item.stack else {
        return Vec::new();
    };

    let inner = bounds.inset(stack.padding);
    let (start, extent) = match stack.axis {
        Axis::Vertical => (inner.y, inner.height),
        Axis::Horizontal => (inner.x, inner.width),
    };
    let cross_axis = match stack.axis {
        Axis::Vertical => Axis::Horizontal,
        Axis::Horizontal => Axis::Vertical,
    };
    let cross_extent = match cross_axis {
        Axis::Vertical => inner.height,
        Axis::Horizontal => inner.width,
    };

    let constraints: Vec<(Size, u16)> = stack.children.iter().map(|c| c.along(stack.axis)).collect();
    let lengths = distribute(&constraints, extent, stack.spacing);

    let mut offset = start;
    stack
        .children
        .iter()
        .zip(lengths)
        .map(|(child, length)| {
            let cross = match child.along(cross_axis) {
                (Size::Fixed(n), min) => n.max(min),
                (Size::Flex(_), _) => cross_extent,
            };
            let rect = match stack.axis {
                Axis::Vertical => Rect::new(inner.x, offset, cross, length),
                Axis::Horizontal => Rect::new(offset, inner.y, length, cross),
            };
            offset = offset.saturating_add(length + stack.spacing);
            rect
        })
        .collect()
}

/// Split `extent` cells among the constraints along one axis
fn distribute(constraints: &[(Size, u16)], extent: u16, spacing: u16) -> Vec<u16> {
    let available = extent.saturating_sub(gaps(constraints.len(), spacing));

    let mut fixed = 0u16;
    let mut weight = 0u32;
    for (size, min) in constraints {
        match size {
            Size::Fixed(n) => fixed = fixed.saturating_add((*n).max(*min)),
            Size::Flex(w) => weight += u32::from(*w),
        }
    }
    let free = u32::from(available.saturating_sub(fixed));

    constraints
        .iter()
        .map(|(size, min)| match size {
            Size::Fixed(n) => (*n).max(*min),
            Size::Flex(w) if weight > 0 => ((free * u32::from(*w) / weight) as u16).max(*min),
            Size::Flex(_) => *min,
        })
        .collect()
}
