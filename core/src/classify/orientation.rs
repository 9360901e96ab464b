use crate::types::{PatientPosition, ViewPlane};

/// Magnitude a cross-product component must reach for the acquisition
/// to count as a cardinal (non-oblique) plane
const OBLIQUE_THRESHOLD: f64 = 0.97;

/// Infers the imaging plane from the ImageOrientationPatient direction
/// cosines (row triple then column triple)
///
/// The patient position selects sign flips for the two triples; the
/// cross product of the flipped triples is the slice normal, and the
/// axis of its largest absolute component names the plane
/// (x → sagittal, y → coronal, z → axial). If no component reaches
/// 0.97 the plane is oblique. Returns `Unknown` when fewer than six
/// cosines are supplied.
pub fn imaging_plane(cosines: &[f64], position: PatientPosition) -> ViewPlane {
    if cosines.len() < 6 {
        return ViewPlane::Unknown;
    }

    let (lr, ap) = position.sign_flips();
    let row = [lr * cosines[0], lr * cosines[1], lr * cosines[2]];
    let col = [ap * cosines[3], ap * cosines[4], ap * cosines[5]];

    let normal = [
        (col[1] * row[2] - col[2] * row[1]).abs(),
        (col[2] * row[0] - col[0] * row[2]).abs(),
        (col[0] * row[1] - col[1] * row[0]).abs(),
    ];

    let (axis, magnitude) = normal
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, m)| (i, *m))
        .unwrap_or((0, 0.0));

    let plane = match axis {
        0 => ViewPlane::Sagittal,
        1 => ViewPlane::Coronal,
        _ => ViewPlane::Axial,
    };

    if magnitude >= OBLIQUE_THRESHOLD {
        plane
    } else {
        plane.oblique()
    }
}

/// Best-effort plane from a free-text description
///
/// Substring heuristic used only when direction cosines are absent;
/// lower confidence than [`imaging_plane`] and documented as such.
/// A plane is returned only when one of its markers is actually
/// present (the source implementation had a truthiness slip that made
/// every description axial; see DESIGN.md).
pub fn plane_from_description(description: &str) -> ViewPlane {
    let text = description.to_uppercase();
    if text.contains("AX") || text.contains("TRA") {
        ViewPlane::Axial
    } else if text.contains("COR") {
        ViewPlane::Coronal
    } else if text.contains("SAG") || text.contains("LONGIT") {
        ViewPlane::Sagittal
    } else {
        ViewPlane::Unknown
    }
}
