use crate::{Environment, Intersection, Ray, Rgb, TriangleSoup};

/// Nearest hit across lit and UI geometry. On equal distance the lit surface wins.
pub fn intersect_any(
    static_soup: &TriangleSoup,
    ui_soup: &TriangleSoup,
    ray: &Ray,
) -> Option<Intersection> {
    let lit = static_soup.intersect(ray);
    let ui = ui_soup.intersect(ray);

    match (lit, ui) {
        (Some(lit), Some(ui)) => Some(if ui.t < lit.t { ui } else { lit }),
        (lit, ui) => lit.or(ui),
    }
}

/// Radiance seen along `ray`: cached lighting of the nearest lit surface, else the environment.
pub fn radiance_along(
    ray: &Ray,
    static_soup: &TriangleSoup,
    environment: &dyn Environment,
) -> Rgb {
    match static_soup.intersect(ray) {
        Some(hit) => hit.radiance,
        None => environment.radiance(ray.direction),
    }
}
