//! Active-region resolution.

use super::registry::Region;

/// Pick the region that owns `scroll_y`.
///
/// Returns the id of the first region, in document order, whose activation
/// window contains the offset. Overlapping windows are settled by order
/// alone. `None` means "no change": callers keep whatever was active before.
///
/// # Example
///
/// ```
/// use folio::nav::{Region, resolve};
///
/// let regions = vec![Region::new("home", 0, 1000)];
/// assert_eq!(resolve(-50, &regions, 100), Some("home"));
/// assert_eq!(resolve(1000, &regions, 100), None);
/// ```
pub fn resolve(scroll_y: i64, regions: &[Region], nav_offset: i64) -> Option<&str> {
    regions
        .iter()
        .find(|region| region.activation_window(nav_offset).contains(&scroll_y))
        .map(|region| region.id.as_str())
}
