//! Release allocation shared by the built-in policies.

use canteen_reservoir::Outlet;

use crate::policy::Releases;

/// Splits `target` across `outlets`, lowest location first.
///
/// Each outlet releases `min(remaining target, max_release(remaining
/// volume))`, clamped to `[0, remaining volume]`, and both remainders are
/// reduced before the next outlet. `None` means no target: every outlet
/// releases its maximum. The returned map keeps the order of `outlets`.
pub fn allocate(outlets: &[Outlet], available: f64, target: Option<f64>) -> Releases {
    let mut releases: Releases = outlets.iter().map(|o| (o.name().to_string(), 0.0)).collect();

    let mut order: Vec<&Outlet> = outlets.iter().collect();
    order.sort_by(|a, b| {
        a.location()
            .total_cmp(&b.location())
            .then_with(|| a.name().cmp(b.name()))
    });

    let mut volume = available.max(0.0);
    let mut remaining = target.map(|t| t.max(0.0));
    for outlet in order {
        if volume <= 0.0 || remaining.is_some_and(|r| r <= 0.0) {
            break;
        }
        let capacity = outlet.max_release(volume);
        let release = remaining
            .map_or(capacity, |r| r.min(capacity))
            .clamp(0.0, volume);
        // NaN from a custom release function releases nothing.
        let release = if release.is_nan() { 0.0 } else { release };
        volume -= release;
        if let Some(r) = remaining.as_mut() {
            *r -= release;
        }
        releases.insert(outlet.name().to_string(), release);
    }
    releases
}
