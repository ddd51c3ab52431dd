//! Digitally lofted hull model.
//!
//! The hull is represented by transverse sections at a set of stations,
//! numbered from bow (lowest) to stern (highest), plus bow and stern end
//! profiles on the centerline. Lengths run along x, half-breadths along w,
//! heights along y, all in inches.

pub mod dimension;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{ModelError, Result};
use crate::fairing::FairCurve;
use crate::hull::dimension::{format_feet_inches, format_inches};
use crate::math::integrate::trapezoid;
use crate::math::{Point2, Point3, TOLERANCE};

/// Fresh water weighs this many pounds per cubic inch.
pub const FRESH_WATER_LB_PER_CUBIC_INCH: f64 = 0.036127;

/// Raw hull offsets, as read from an offsets table.
///
/// Station tables are keyed by station number. Breadth lists hold
/// (half-breadth, height) pairs sorted from sheer to bottom (descending
/// height). End profiles hold (length, height) pairs from sheer to bottom.
#[derive(Debug, Clone)]
pub struct HullData {
    pub title: String,
    /// Hull material thickness added to outside measurements.
    pub hull_thickness: f64,
    pub station_positions: BTreeMap<i32, f64>,
    pub sheer_height: BTreeMap<i32, f64>,
    pub profile_height: BTreeMap<i32, f64>,
    pub sheer_breadth: BTreeMap<i32, f64>,
    pub breadths: BTreeMap<i32, Vec<Point2>>,
    pub bow_profile: Vec<Point2>,
    pub stern_profile: Vec<Point2>,
}

impl Default for HullData {
    fn default() -> Self {
        Self {
            title: "Hull".to_string(),
            hull_thickness: 0.25,
            station_positions: BTreeMap::new(),
            sheer_height: BTreeMap::new(),
            profile_height: BTreeMap::new(),
            sheer_breadth: BTreeMap::new(),
            breadths: BTreeMap::new(),
            bow_profile: Vec::new(),
            stern_profile: Vec::new(),
        }
    }
}

/// Plan area slice at one depth above the hull bottom.
#[derive(Debug, Clone, Copy)]
pub struct PlanArea {
    /// Depth above the hull bottom, inches.
    pub depth: f64,
    /// Plan area (both halves), square inches.
    pub area: f64,
    /// Length coordinate of the area centroid.
    pub center: f64,
}

/// Displacement at one draft.
#[derive(Debug, Clone, Copy)]
pub struct Displacement {
    /// Draft above the hull bottom, inches.
    pub draft: f64,
    /// Fresh-water displacement, pounds.
    pub pounds: f64,
    /// Length coordinate of the center of buoyancy.
    pub center: f64,
}

/// A validated hull with its derived indices and faired curves.
///
/// Construction validates the station tables and fits every station-level
/// fair curve up front; transforms return a new `Hull` rather than mutating.
#[derive(Debug, Clone)]
pub struct Hull {
    data: HullData,
    bow_station: i32,
    stern_station: i32,
    mid_station: i32,
    max_width: f64,
    bottom_height: f64,
    upside_down: bool,
    breadth_fairers: BTreeMap<i32, FairCurve>,
    profile_fairer: FairCurve,
    profile_mid_index: usize,
    sheer_profile_fairer: FairCurve,
    sheer_breadth_fairer: FairCurve,
}

impl Hull {
    /// Validates raw offsets and builds the hull with its faired curves.
    ///
    /// # Errors
    ///
    /// Fails when there are no stations, when any station table's key set
    /// differs from the positions table, or when an end profile is empty.
    pub fn from_data(data: HullData) -> Result<Self> {
        if data.station_positions.is_empty() {
            return Err(ModelError::NoStations.into());
        }
        for (table, keys) in [
            ("sheer heights", data.sheer_height.keys()),
            ("profile heights", data.profile_height.keys()),
            ("sheer breadths", data.sheer_breadth.keys()),
        ] {
            if !keys.eq(data.station_positions.keys()) {
                return Err(ModelError::StationMismatch { table }.into());
            }
        }
        if !data.breadths.keys().eq(data.station_positions.keys()) {
            return Err(ModelError::StationMismatch { table: "breadths" }.into());
        }
        if data.bow_profile.is_empty() {
            return Err(ModelError::EmptyEndProfile { end: "bow" }.into());
        }
        if data.stern_profile.is_empty() {
            return Err(ModelError::EmptyEndProfile { end: "stern" }.into());
        }

        let stations: Vec<i32> = data.station_positions.keys().copied().collect();
        let bow_station = stations[0];
        let stern_station = stations[stations.len() - 1];

        // Widest breadth point in all the data picks the mid station.
        let mut max_width = 0.001;
        let mut mid_station = bow_station;
        for (&s, points) in &data.breadths {
            for p in points {
                if p.x > max_width {
                    max_width = p.x;
                    mid_station = s;
                }
            }
        }
        debug!(mid_station, "widest station");

        // The model may be drawn with y increasing downward; the first two
        // station bottom heights tell which way is up.
        let upside_down = stations.len() > 1
            && data.profile_height[&stations[0]] > data.profile_height[&stations[1]];
        let mut bottom_height = data.profile_height[&bow_station];
        for s in &stations {
            let h = data.profile_height[s];
            if (upside_down && h < bottom_height) || (!upside_down && h > bottom_height) {
                bottom_height = h;
            }
        }

        let mut breadth_fairers = BTreeMap::new();
        for &s in &stations {
            let section = breadth_section(&data, s);
            // Mirror across the centerline so the curve is continuous over
            // the keel: sheer down to the keel, back up to -sheer.
            let mut mirrored = vec![section[0]];
            for p in &section[1..] {
                mirrored.insert(0, *p);
                mirrored.push(Point2::new(-p.x, p.y));
            }
            let mid = mirrored.len() / 2;
            breadth_fairers.insert(s, FairCurve::with_mid_index(mirrored, mid)?);
        }

        let (profile_points, profile_mid_index) = profile_curve_points(&data, mid_station);
        let profile_fairer = FairCurve::with_mid_index(profile_points, profile_mid_index)?;

        let mut sheer_profile = vec![data.bow_profile[0]];
        for &s in &stations {
            sheer_profile.push(Point2::new(data.station_positions[&s], data.sheer_height[&s]));
        }
        sheer_profile.push(data.stern_profile[0]);
        let sheer_profile_fairer = FairCurve::new(sheer_profile)?;

        let mut sheer_plan = vec![Point2::new(data.bow_profile[0].x, 0.0)];
        for &s in &stations {
            sheer_plan.push(Point2::new(data.station_positions[&s], data.sheer_breadth[&s]));
        }
        sheer_plan.push(Point2::new(data.stern_profile[0].x, 0.0));
        let sheer_breadth_fairer = FairCurve::new(sheer_plan)?;

        Ok(Self {
            data,
            bow_station,
            stern_station,
            mid_station,
            max_width,
            bottom_height,
            upside_down,
            breadth_fairers,
            profile_fairer,
            profile_mid_index,
            sheer_profile_fairer,
            sheer_breadth_fairer,
        })
    }

    /// The raw offsets the hull was built from.
    #[must_use]
    pub fn data(&self) -> &HullData {
        &self.data
    }

    /// Station numbers from bow to stern (low to high).
    #[must_use]
    pub fn stations(&self) -> Vec<i32> {
        self.data.station_positions.keys().copied().collect()
    }

    /// Station closest to the bow.
    #[must_use]
    pub fn bow_station(&self) -> i32 {
        self.bow_station
    }

    /// Station closest to the stern.
    #[must_use]
    pub fn stern_station(&self) -> i32 {
        self.stern_station
    }

    /// Station with the widest breadth.
    #[must_use]
    pub fn mid_station(&self) -> i32 {
        self.mid_station
    }

    /// Maximum half-breadth in the data.
    #[must_use]
    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// Height of the lowest point of the hull, on the centerline.
    #[must_use]
    pub fn bottom_height(&self) -> f64 {
        self.bottom_height
    }

    /// True when the model's y axis increases upward in the raw data.
    #[must_use]
    pub fn upside_down(&self) -> bool {
        self.upside_down
    }

    /// Breadth section at a station, keel to sheer, as (half-breadth,
    /// height) pairs. `None` for an unknown station.
    #[must_use]
    pub fn breadth_curve(&self, station: i32) -> Option<Vec<Point2>> {
        if self.data.station_positions.contains_key(&station) {
            Some(breadth_section(&self.data, station))
        } else {
            None
        }
    }

    /// Faired breadth section at a station, mirrored over the keel.
    #[must_use]
    pub fn breadth_fairer(&self, station: i32) -> Option<&FairCurve> {
        self.breadth_fairers.get(&station)
    }

    /// Faired bottom profile, bow tip to stern tip.
    #[must_use]
    pub fn profile_fairer(&self) -> &FairCurve {
        &self.profile_fairer
    }

    /// Faired sheer height over length.
    #[must_use]
    pub fn sheer_profile_fairer(&self) -> &FairCurve {
        &self.sheer_profile_fairer
    }

    /// Faired sheer half-breadth over length.
    #[must_use]
    pub fn sheer_breadth_fairer(&self) -> &FairCurve {
        &self.sheer_breadth_fairer
    }

    /// Interpolated length of the bow profile at a height, from the bow half
    /// of the faired bottom profile. Falls back to the mid-station position
    /// when the height is off the curve.
    #[must_use]
    pub fn bow_profile_interpolated(&self, height: f64) -> f64 {
        match self
            .profile_fairer
            .x_at_between(height, 0, self.profile_mid_index)
        {
            Ok(x) => x,
            Err(e) => {
                warn!(height, error = %e, "bow profile lookup fell back to mid station");
                self.data.station_positions[&self.mid_station]
            }
        }
    }

    /// Interpolated length of the stern profile at a height, with the same
    /// fallback as the bow lookup.
    #[must_use]
    pub fn stern_profile_interpolated(&self, height: f64) -> f64 {
        match self.profile_fairer.x_at_between(
            height,
            self.profile_mid_index,
            self.profile_fairer.max_parameter(),
        ) {
            Ok(x) => x,
            Err(e) => {
                warn!(height, error = %e, "stern profile lookup fell back to mid station");
                self.data.station_positions[&self.mid_station]
            }
        }
    }

    /// Plan outline of the hull at a height, stern to bow, as (length,
    /// half-breadth) pairs. Stations whose section does not reach the height
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Fails if the hull is not oriented bow toward +x, or the height is
    /// below the hull bottom.
    pub fn outline_at_height(&self, height: f64) -> Result<Vec<Point2>> {
        if self.data.bow_profile[0].x <= self.data.stern_profile[0].x {
            return Err(ModelError::Unoriented.into());
        }
        if height < self.bottom_height + 0.001 {
            return Err(ModelError::HeightBelowHull { height }.into());
        }
        let bow_x = self.bow_profile_interpolated(height);
        let stern_x = self.stern_profile_interpolated(height);
        let mut outline = vec![Point2::new(stern_x, 0.0)];
        for s in self.stations().into_iter().rev() {
            let x = self.data.station_positions[&s];
            if x > bow_x {
                break;
            }
            if x < stern_x {
                continue;
            }
            if let Some(fairer) = self.breadth_fairers.get(&s) {
                match fairer.x_at(height) {
                    Ok(w) => outline.push(Point2::new(x, w)),
                    Err(e) => debug!(station = s, error = %e, "no breadth at height"),
                }
            }
        }
        outline.push(Point2::new(bow_x, 0.0));
        Ok(outline)
    }

    /// Fair curve through the plan outline at a height, for width-at-length
    /// interpolation.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::outline_at_height`].
    pub fn outline_fairer_at_height(&self, height: f64) -> Result<FairCurve> {
        FairCurve::new(self.outline_at_height(height)?)
    }

    /// Plan area and area centroid at a height. Below the bottom the area is
    /// zero with the centroid at the mid station.
    ///
    /// # Errors
    ///
    /// Fails if the hull is not oriented bow toward +x.
    pub fn area_at_height(&self, height: f64) -> Result<(f64, f64)> {
        if height < self.bottom_height + 0.001 {
            return Ok((0.0, self.data.station_positions[&self.mid_station]));
        }
        let outline = self.outline_at_height(height)?;
        let xx: Vec<f64> = outline.iter().map(|p| p.x).collect();
        let ww: Vec<f64> = outline.iter().map(|p| p.y).collect();
        let xw: Vec<f64> = outline.iter().map(|p| p.x * p.y).collect();
        let area = 2.0 * trapezoid(&ww, &xx);
        let center = if area.abs() < TOLERANCE {
            self.data.station_positions[&self.mid_station]
        } else {
            2.0 * trapezoid(&xw, &xx) / area
        };
        debug!(height, area, center, "plan area");
        Ok((area, center))
    }

    /// Plan areas and centroids at progressive depths above the bottom,
    /// from `start` to `end` inclusive in `step` increments.
    ///
    /// # Errors
    ///
    /// Fails if any outline fails.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn area_depth_table(&self, start: f64, end: f64, step: f64) -> Result<Vec<PlanArea>> {
        let mut table = Vec::new();
        let count = ((end - start) / step).round() as usize;
        for i in 0..=count {
            let depth = start + i as f64 * step;
            let (area, center) = self.area_at_height(self.bottom_height + depth)?;
            table.push(PlanArea {
                depth,
                area,
                center,
            });
        }
        Ok(table)
    }

    /// Displacement and center of buoyancy at drafts from `start` to `end`
    /// in `step` increments.
    ///
    /// Area slices are taken at one fifth of the draft step; each draft
    /// integrates the slices from the bottom up.
    ///
    /// # Errors
    ///
    /// Fails if the underlying area table fails.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn displacement_table(&self, start: f64, end: f64, step: f64) -> Result<Vec<Displacement>> {
        let slices = self.area_depth_table(0.0, end, step / 5.0)?;
        let depths: Vec<f64> = slices.iter().map(|s| s.depth).collect();
        let areas: Vec<f64> = slices.iter().map(|s| s.area).collect();
        let weighted: Vec<f64> = slices.iter().map(|s| s.area * s.center).collect();
        let mut table = Vec::new();
        let count = ((end - start) / step).round() as usize;
        for k in 0..=count {
            let draft = start + k as f64 * step;
            if let Some(i) = depths.iter().position(|&d| d >= draft - 1e-9) {
                let volume = trapezoid(&areas[..=i], &depths[..=i]);
                let center = if volume.abs() < TOLERANCE {
                    self.data.station_positions[&self.mid_station]
                } else {
                    trapezoid(&weighted[..=i], &depths[..=i]) / volume
                };
                table.push(Displacement {
                    draft: depths[i],
                    pounds: volume * FRESH_WATER_LB_PER_CUBIC_INCH,
                    center,
                });
            }
        }
        Ok(table)
    }

    /// One line per draft summarizing displacement and center of buoyancy.
    ///
    /// # Errors
    ///
    /// Fails if the displacement table fails.
    pub fn displacement_summary(&self) -> Result<String> {
        let mut s = String::new();
        for d in self.displacement_table(2.0, 6.0, 0.5)? {
            s.push_str(&format!(
                "  {:.1}\" at {:.1}lbs total weight @ {:.1}\" (including boat)\n",
                d.draft, d.pounds, d.center
            ));
        }
        Ok(s)
    }

    /// New hull with faired breadth points inserted at `height` at every
    /// station whose section spans that height. Stations where the lookup
    /// fails are left unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the rebuilt hull fails validation.
    pub fn with_breadths_at_height(&self, height: f64) -> Result<Self> {
        let mut data = self.data.clone();
        for s in self.stations() {
            if height >= self.data.sheer_height[&s] || height <= self.data.profile_height[&s] {
                continue;
            }
            let Some(fairer) = self.breadth_fairers.get(&s) else {
                continue;
            };
            match fairer.x_at(height) {
                Ok(width) => {
                    if let Some(points) = data.breadths.get_mut(&s) {
                        insert_breadth_point(points, Point2::new(width, height));
                    }
                }
                Err(e) => {
                    warn!(station = s, height, error = %e, "no faired width at height");
                }
            }
        }
        Self::from_data(data)
    }

    /// Faired (half-breadth, height) pairs at a length for each requested
    /// height, skipping heights out of range or within 0.25" of the sheer.
    ///
    /// # Errors
    ///
    /// Fails if an outline cannot be built at a height.
    pub fn interpolated_breadths(
        &self,
        length: f64,
        heights: &[f64],
        max_height: f64,
    ) -> Result<Vec<Point2>> {
        let mut breadths = Vec::new();
        for &h in heights {
            if h > max_height - 0.25 {
                continue;
            }
            if h < self.bottom_height + 0.001 {
                continue;
            }
            match self.outline_fairer_at_height(h)?.y_at(length) {
                Ok(w) => breadths.push(Point2::new(w, h)),
                Err(e) => debug!(height = h, length, error = %e, "breadth out of range"),
            }
        }
        Ok(breadths)
    }

    /// New hull re-stationed at the given length positions, with breadth
    /// points at the given heights, all values taken from the faired curves.
    ///
    /// Stations are numbered from the stern (lowest position, highest
    /// number) to the bow (highest position, station 0). End profiles carry
    /// over unchanged.
    ///
    /// # Errors
    ///
    /// Fails if a faired lookup fails at a station position or the rebuilt
    /// hull fails validation.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn with_stations(&self, positions: &[f64], heights: &[f64]) -> Result<Self> {
        let mut positions = positions.to_vec();
        positions.sort_by(f64::total_cmp);
        let mut heights = heights.to_vec();
        heights.sort_by(f64::total_cmp);
        heights.reverse();

        let mut data = self.data.clone();
        data.station_positions.clear();
        data.sheer_height.clear();
        data.profile_height.clear();
        data.sheer_breadth.clear();
        data.breadths.clear();
        let mut index = positions.len() as i32;
        for &l in &positions {
            index -= 1;
            let sheer = self.sheer_profile_fairer.y_at(l)?;
            data.station_positions.insert(index, l);
            data.sheer_height.insert(index, sheer);
            data.sheer_breadth.insert(index, self.sheer_breadth_fairer.y_at(l)?);
            data.profile_height.insert(index, self.profile_fairer.y_at(l)?);
            data.breadths
                .insert(index, self.interpolated_breadths(l, &heights, sheer)?);
        }
        Self::from_data(data)
    }

    /// New hull with `offset` added to every length coordinate, then scaled
    /// by `scale`.
    ///
    /// # Errors
    ///
    /// Fails if the rebuilt hull fails validation.
    pub fn offset_scale_length(&self, offset: f64, scale: f64) -> Result<Self> {
        let mut data = self.data.clone();
        for x in data.station_positions.values_mut() {
            *x = (*x + offset) * scale;
        }
        for p in data.bow_profile.iter_mut().chain(data.stern_profile.iter_mut()) {
            p.x = (p.x + offset) * scale;
        }
        Self::from_data(data)
    }

    /// New hull with `offset` added to every vertical coordinate, then
    /// scaled by `scale`.
    ///
    /// # Errors
    ///
    /// Fails if the rebuilt hull fails validation.
    pub fn offset_scale_vertical(&self, offset: f64, scale: f64) -> Result<Self> {
        let mut data = self.data.clone();
        for y in data
            .sheer_height
            .values_mut()
            .chain(data.profile_height.values_mut())
        {
            *y = (*y + offset) * scale;
        }
        for points in data.breadths.values_mut() {
            for p in points.iter_mut() {
                p.y = (p.y + offset) * scale;
            }
        }
        for p in data.bow_profile.iter_mut().chain(data.stern_profile.iter_mut()) {
            p.y = (p.y + offset) * scale;
        }
        Self::from_data(data)
    }

    /// New hull with every width coordinate scaled by `scale`.
    ///
    /// # Errors
    ///
    /// Fails if the rebuilt hull fails validation.
    pub fn scale_width(&self, scale: f64) -> Result<Self> {
        let mut data = self.data.clone();
        for w in data.sheer_breadth.values_mut() {
            *w *= scale;
        }
        for points in data.breadths.values_mut() {
            for p in points.iter_mut() {
                p.x *= scale;
            }
        }
        Self::from_data(data)
    }

    /// New hull normalized to stern at x=0, bottom at y=0, bow toward +x
    /// and up toward +y.
    ///
    /// # Errors
    ///
    /// Fails if the rebuilt hull fails validation.
    pub fn normalized(&self) -> Result<Self> {
        let bow_x = self.data.bow_profile[0].x;
        let stern_x = self.data.stern_profile[0].x;
        let scale = if bow_x > stern_x { 1.0 } else { -1.0 };
        let flipped = self.offset_scale_length(-stern_x, scale)?;
        let bottom = flipped.bottom_height();
        let vscale = if flipped.upside_down() { 1.0 } else { -1.0 };
        flipped.offset_scale_vertical(-bottom, vscale)
    }

    /// Stations from the stern to the mid station, inclusive.
    #[must_use]
    pub fn stern_to_mid_stations(&self) -> Vec<i32> {
        let mut out = Vec::new();
        for s in self.stations().into_iter().rev() {
            out.push(s);
            if s <= self.mid_station {
                break;
            }
        }
        out
    }

    /// Stations from the bow to the mid station, inclusive.
    #[must_use]
    pub fn bow_to_mid_stations(&self) -> Vec<i32> {
        let mut out = Vec::new();
        for s in self.stations() {
            out.push(s);
            if s >= self.mid_station {
                break;
            }
        }
        out
    }

    /// Hull length from bow tip to stern tip.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.data.bow_profile[0].x - self.data.stern_profile[0].x).abs()
    }

    /// Sheer (gunwale) line in 3D from bow to stern, as (length, breadth,
    /// height) points.
    #[must_use]
    pub fn sheer_curve_3d(&self) -> Vec<Point3> {
        let mut points = vec![Point3::new(
            self.data.bow_profile[0].x,
            0.0,
            self.data.bow_profile[0].y,
        )];
        for s in self.stations() {
            points.push(Point3::new(
                self.data.station_positions[&s],
                self.data.sheer_breadth[&s],
                self.data.sheer_height[&s],
            ));
        }
        points.push(Point3::new(
            self.data.stern_profile[0].x,
            0.0,
            self.data.stern_profile[0].y,
        ));
        points
    }

    /// Length of the sheer line, by linear interpolation between stations.
    #[must_use]
    pub fn sheer_length(&self) -> f64 {
        self.sheer_curve_3d()
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum()
    }

    /// Beam (full width) at the sheer line.
    #[must_use]
    pub fn beam_sheer(&self) -> f64 {
        2.0 * self
            .data
            .sheer_breadth
            .values()
            .fold(0.0f64, |acc, &w| acc.max(w))
    }

    /// Depth from sheer to center hull bottom at a station.
    #[must_use]
    pub fn depth(&self, station: i32) -> Option<f64> {
        Some(self.data.sheer_height.get(&station)? - self.data.profile_height.get(&station)?)
    }

    /// Length around the outside of the hull section at a station, by
    /// linear interpolation between breadth points.
    #[must_use]
    pub fn circumference(&self, station: i32) -> Option<f64> {
        let curve = self.breadth_curve(station)?;
        let half: f64 = curve.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        Some(half * 2.0)
    }

    /// Outside hull surface area estimate in square inches, trapezium rule
    /// over station circumferences.
    #[must_use]
    pub fn hull_outside_area(&self) -> f64 {
        let mut area = 0.0;
        let mut last: Option<(f64, f64)> = None;
        for s in self.stations() {
            let Some(circ) = self.circumference(s) else {
                continue;
            };
            let position = self.data.station_positions[&s];
            match last {
                None => {
                    area += 0.5 * circ * (self.data.bow_profile[0].x - position).abs();
                }
                Some((last_circ, last_position)) => {
                    area += 0.5 * (circ + last_circ) * (last_position - position).abs();
                }
            }
            last = Some((circ, position));
        }
        if let Some((last_circ, last_position)) = last {
            area += 0.5 * last_circ * (self.data.stern_profile[0].x - last_position).abs();
        }
        area
    }

    /// Extra length from the hull thickness at the bow and stern.
    ///
    /// Scales the triangle between the centerline, the end of the sheer and
    /// the sheer breadth at the closest station out by the hull thickness.
    #[must_use]
    pub fn sheer_length_extension_through_thickness(&self) -> f64 {
        let bow_dy = self.data.sheer_breadth[&self.bow_station];
        let bow_dx =
            (self.data.station_positions[&self.bow_station] - self.data.bow_profile[0].x).abs();
        let bow_extension = bow_dx * ((bow_dy + self.data.hull_thickness) / bow_dy - 1.0);
        let stern_dy = self.data.sheer_breadth[&self.stern_station];
        let stern_dx = (self.data.station_positions[&self.stern_station]
            - self.data.stern_profile[0].x)
            .abs();
        let stern_extension = stern_dx * ((stern_dy + self.data.hull_thickness) / stern_dy - 1.0);
        debug!(bow_extension, stern_extension, "sheer length extensions");
        bow_extension + stern_extension
    }

    /// Model length plus the extension through the hull thickness.
    #[must_use]
    pub fn outside_length(&self) -> f64 {
        self.length() + self.sheer_length_extension_through_thickness()
    }

    /// Model max beam plus two hull thicknesses.
    #[must_use]
    pub fn outside_max_beam(&self) -> f64 {
        (self.max_width + self.data.hull_thickness) * 2.0
    }

    /// Model sheer beam plus two hull thicknesses.
    #[must_use]
    pub fn outside_sheer_beam(&self) -> f64 {
        self.beam_sheer() + self.data.hull_thickness * 2.0
    }

    /// Model depth at the mid station plus the hull thickness.
    #[must_use]
    pub fn outside_center_depth(&self) -> f64 {
        self.depth(self.mid_station).unwrap_or(0.0) + self.data.hull_thickness
    }

    /// Minimum and maximum length coordinates, rounded out to whole inches
    /// when `round_out` is set.
    #[must_use]
    pub fn min_max_length(&self, round_out: bool) -> (f64, f64) {
        let a = self.data.bow_profile[0].x;
        let b = self.data.stern_profile[0].x;
        round_out_range(a.min(b), a.max(b), round_out)
    }

    /// Minimum and maximum vertical coordinates over sheer and profile
    /// heights, rounded out to whole inches when `round_out` is set.
    #[must_use]
    pub fn min_max_vertical(&self, round_out: bool) -> (f64, f64) {
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for s in self.stations() {
            for y in [self.data.sheer_height[&s], self.data.profile_height[&s]] {
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
        round_out_range(min_y, max_y, round_out)
    }

    /// Multi-line summary of the principal hull dimensions, displacements
    /// and construction estimates.
    ///
    /// # Errors
    ///
    /// Fails if the displacement calculation fails.
    pub fn summary_stats(&self) -> Result<String> {
        let mid_bottom = self.data.profile_height[&self.mid_station];
        let thickness = self.data.hull_thickness;
        let mut s = String::from("\nSummary dimensions (outside):\n");
        s.push_str(&format!(
            "Length: {} = {}\n",
            format_feet_inches(self.outside_length()),
            format_inches(self.outside_length())
        ));
        s.push_str(&format!(
            "Beam: {:.1}\"(max) {:.1}\"(sheer)\n",
            self.outside_max_beam(),
            self.outside_sheer_beam()
        ));
        s.push_str(&format!("Center depth: {:.1}\"\n", self.outside_center_depth()));
        s.push_str(&format!(
            "Bow height: {:.1}\"\n",
            self.data.bow_profile[0].y - mid_bottom + thickness
        ));
        s.push_str(&format!(
            "Stern height: {:.1}\"\n",
            self.data.stern_profile[0].y - mid_bottom + thickness
        ));
        s.push_str("Displacements:\n");
        s.push_str(&self.displacement_summary()?);
        s.push('\n');
        s.push_str("Summary dimensions (inside/form):\n");
        s.push_str(&format!(
            "Length: {} = {}\n",
            format_feet_inches(self.length()),
            format_inches(self.length())
        ));
        s.push_str(&format!(
            "Beam: {:.1}\"(max) {:.1}\"(sheer)\n",
            self.max_width * 2.0,
            self.beam_sheer()
        ));
        s.push_str(&format!(
            "Centre depth: {:.1}\"\n",
            self.depth(self.mid_station).unwrap_or(0.0)
        ));
        s.push_str(&format!(
            "Bow height: {:.1}\"\n",
            self.data.bow_profile[0].y - mid_bottom
        ));
        s.push_str(&format!(
            "Stern height: {:.1}\"\n",
            self.data.stern_profile[0].y - mid_bottom
        ));
        s.push('\n');
        s.push_str("Construction dimensions:\n");
        s.push_str(&format!(
            "Gunwale length: {}\n",
            format_feet_inches(
                self.sheer_length() + self.sheer_length_extension_through_thickness()
            )
        ));
        let outside_circ = self.circumference(self.mid_station).unwrap_or(0.0) + 2.0 * thickness;
        s.push_str(&format!(
            "External circumference: {}\n",
            format_inches(outside_circ)
        ));
        let area_sq_ft = self.hull_outside_area() / 144.0;
        s.push_str(&format!("Hull outside area estimate: {area_sq_ft:.1} sq ft\n"));
        s.push_str(&format!(
            "Strip estimate (5/8\" strips, 20% over): {:.1} ft\n",
            area_sq_ft * 12.0 * 8.0 / 5.0
        ));
        Ok(s)
    }
}

/// Breadth section at a station, keel to sheer.
fn breadth_section(data: &HullData, station: i32) -> Vec<Point2> {
    let mut section = vec![Point2::new(0.0, data.profile_height[&station])];
    for p in data.breadths[&station].iter().rev() {
        section.push(*p);
    }
    section.push(Point2::new(
        data.sheer_breadth[&station],
        data.sheer_height[&station],
    ));
    section
}

/// Bottom profile points bow tip to stern tip, with the index of the mid
/// station point.
fn profile_curve_points(data: &HullData, mid_station: i32) -> (Vec<Point2>, usize) {
    let mut points: Vec<Point2> = data.bow_profile.clone();
    let mut mid_index = 0;
    for (&s, &x) in &data.station_positions {
        points.push(Point2::new(x, data.profile_height[&s]));
        if s == mid_station {
            mid_index = points.len() - 1;
        }
    }
    for p in data.stern_profile.iter().rev() {
        points.push(*p);
    }
    (points, mid_index)
}

/// Inserts a breadth point keeping the sheer-to-bottom (descending height)
/// ordering.
fn insert_breadth_point(points: &mut Vec<Point2>, point: Point2) {
    let at = points
        .iter()
        .position(|p| p.y < point.y)
        .unwrap_or(points.len());
    points.insert(at, point);
}

fn round_out_range(min: f64, max: f64, round_out: bool) -> (f64, f64) {
    if round_out {
        (-(-min + 1.0).trunc(), (max + 1.0).trunc())
    } else {
        (min, max)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    // Small three-station hull, bow toward +x, y up, bottom at y=0.
    fn test_data() -> HullData {
        let mut data = HullData::default();
        for (s, x) in [(0, 24.0), (1, 12.0), (2, 0.0)] {
            data.station_positions.insert(s, x);
        }
        for (s, y) in [(0, 12.0), (1, 10.0), (2, 12.0)] {
            data.sheer_height.insert(s, y);
        }
        for (s, y) in [(0, 2.0), (1, 0.0), (2, 2.0)] {
            data.profile_height.insert(s, y);
        }
        for (s, w) in [(0, 4.0), (1, 8.0), (2, 4.0)] {
            data.sheer_breadth.insert(s, w);
        }
        let end = vec![
            Point2::new(4.0, 12.0),
            Point2::new(3.0, 6.0),
            Point2::new(1.0, 2.5),
        ];
        data.breadths.insert(0, end.clone());
        data.breadths.insert(2, end);
        data.breadths.insert(
            1,
            vec![
                Point2::new(8.0, 10.0),
                Point2::new(7.0, 5.0),
                Point2::new(3.0, 0.5),
            ],
        );
        data.bow_profile = vec![
            Point2::new(26.0, 12.0),
            Point2::new(25.5, 8.0),
            Point2::new(25.0, 4.0),
            Point2::new(24.0, 2.0),
        ];
        data.stern_profile = vec![
            Point2::new(-2.0, 12.0),
            Point2::new(-1.5, 8.0),
            Point2::new(-1.0, 4.0),
            Point2::new(0.0, 2.0),
        ];
        data
    }

    fn test_hull() -> Hull {
        Hull::from_data(test_data()).unwrap()
    }

    #[test]
    fn derived_indices() {
        let hull = test_hull();
        assert_eq!(hull.bow_station(), 0);
        assert_eq!(hull.stern_station(), 2);
        assert_eq!(hull.mid_station(), 1);
        assert_relative_eq!(hull.max_width(), 8.0);
        assert_relative_eq!(hull.bottom_height(), 0.0);
        assert!(hull.upside_down());
        assert_relative_eq!(hull.length(), 28.0);
    }

    #[test]
    fn mismatched_station_tables_are_rejected() {
        let mut data = test_data();
        data.breadths.remove(&1);
        match Hull::from_data(data) {
            Err(crate::FairlineError::Model(ModelError::StationMismatch { table })) => {
                assert_eq!(table, "breadths");
            }
            other => panic!("expected station mismatch, got {other:?}"),
        }
        let mut data = test_data();
        data.sheer_height.insert(7, 1.0);
        assert!(Hull::from_data(data).is_err());
    }

    #[test]
    fn empty_model_is_rejected() {
        assert!(matches!(
            Hull::from_data(HullData::default()),
            Err(crate::FairlineError::Model(ModelError::NoStations))
        ));
        let mut data = test_data();
        data.bow_profile.clear();
        assert!(Hull::from_data(data).is_err());
    }

    #[test]
    fn breadth_fairer_is_mirrored_over_the_keel() {
        let hull = test_hull();
        let fairer = hull.breadth_fairer(1).unwrap();
        let mid = fairer.mid_index().unwrap();
        let points = fairer.points();
        assert_eq!(points.len(), 2 * mid + 1);
        assert_relative_eq!(points[mid].x, 0.0);
        for i in 0..mid {
            assert_relative_eq!(points[i].x, -points[points.len() - 1 - i].x);
            assert_relative_eq!(points[i].y, points[points.len() - 1 - i].y);
        }
    }

    #[test]
    fn end_profile_lookups_and_fallback() {
        let hull = test_hull();
        let bow_x = hull.bow_profile_interpolated(6.0);
        let stern_x = hull.stern_profile_interpolated(6.0);
        assert!(bow_x > 24.0 && bow_x < 26.0);
        assert!(stern_x > -2.0 && stern_x < 0.0);
        // Far above the sheer the lookup falls back to the mid station.
        assert_relative_eq!(hull.bow_profile_interpolated(100.0), 12.0);
    }

    #[test]
    fn outline_runs_stern_to_bow() {
        let hull = test_hull();
        let outline = hull.outline_at_height(5.0).unwrap();
        assert!(outline.len() >= 4);
        assert_relative_eq!(outline[0].y, 0.0);
        assert_relative_eq!(outline.last().unwrap().y, 0.0);
        assert!(outline.windows(2).all(|w| w[0].x < w[1].x));
        for p in &outline[1..outline.len() - 1] {
            assert!(p.y > 0.0);
        }
    }

    #[test]
    fn outline_below_bottom_is_an_error() {
        let hull = test_hull();
        assert!(matches!(
            hull.outline_at_height(-1.0),
            Err(crate::FairlineError::Model(ModelError::HeightBelowHull { .. }))
        ));
    }

    #[test]
    fn reversed_hull_outline_is_rejected() {
        let hull = test_hull();
        let reversed = hull.offset_scale_length(-13.0, -1.0).unwrap();
        assert!(matches!(
            reversed.outline_at_height(5.0),
            Err(crate::FairlineError::Model(ModelError::Unoriented))
        ));
    }

    #[test]
    fn plan_areas_grow_with_height() {
        let hull = test_hull();
        let (zero, center) = hull.area_at_height(-0.5).unwrap();
        assert_relative_eq!(zero, 0.0);
        assert_relative_eq!(center, 12.0);
        let (low, _) = hull.area_at_height(3.0).unwrap();
        let (high, high_center) = hull.area_at_height(8.0).unwrap();
        assert!(low > 0.0);
        assert!(high > low);
        assert!(high_center > 0.0 && high_center < 24.0);
    }

    #[test]
    fn displacement_increases_with_draft() {
        let hull = test_hull();
        let table = hull.displacement_table(1.0, 3.0, 1.0).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.windows(2).all(|w| w[0].pounds < w[1].pounds));
        for d in &table {
            assert!(d.center > 0.0 && d.center < 24.0);
        }
        assert!(!hull.displacement_summary().unwrap().is_empty());
    }

    #[test]
    fn normalization_puts_stern_at_origin() {
        let hull = test_hull();
        let shifted = hull.offset_scale_length(5.0, 1.0).unwrap();
        let normalized = shifted.normalized().unwrap();
        assert_relative_eq!(normalized.data().stern_profile[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(normalized.bottom_height(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(normalized.length(), hull.length(), epsilon = 1e-9);
        assert!(normalized.data().bow_profile[0].x > 0.0);
    }

    #[test]
    fn width_scaling() {
        let hull = test_hull();
        let wide = hull.scale_width(2.0).unwrap();
        assert_relative_eq!(wide.max_width(), 16.0);
        assert_relative_eq!(wide.beam_sheer(), 32.0);
    }

    #[test]
    fn inserted_breadths_keep_descending_order() {
        let hull = test_hull();
        let refined = hull.with_breadths_at_height(4.0).unwrap();
        for s in refined.stations() {
            let points = &refined.data().breadths[&s];
            assert!(points.len() > 3, "station {s} should gain a point");
            assert!(points.windows(2).all(|w| w[0].y > w[1].y));
        }
    }

    #[test]
    fn restationing_resamples_the_faired_hull() {
        let hull = test_hull();
        let restationed = hull
            .with_stations(&[4.0, 12.0, 20.0], &[2.0, 4.0, 6.0, 8.0])
            .unwrap();
        assert_eq!(restationed.stations(), vec![0, 1, 2]);
        // Station 0 is at the bow end (highest position).
        assert_relative_eq!(restationed.data().station_positions[&0], 20.0);
        assert_relative_eq!(restationed.data().station_positions[&2], 4.0);
        // Middle station keeps roughly the original sheer height.
        assert_relative_eq!(restationed.data().sheer_height[&1], 10.0, epsilon = 0.5);
        for s in restationed.stations() {
            assert!(!restationed.data().breadths[&s].is_empty());
        }
    }

    #[test]
    fn station_walks_to_the_middle() {
        let hull = test_hull();
        assert_eq!(hull.stern_to_mid_stations(), vec![2, 1]);
        assert_eq!(hull.bow_to_mid_stations(), vec![0, 1]);
    }

    #[test]
    fn summary_measurements() {
        let hull = test_hull();
        assert_relative_eq!(hull.beam_sheer(), 16.0);
        assert_relative_eq!(hull.depth(1).unwrap(), 10.0);
        assert!(hull.depth(9).is_none());
        let circ = hull.circumference(1).unwrap();
        // At least twice the straight keel-to-sheer distance per side.
        assert!(circ > 2.0 * 10.0);
        assert!(hull.circumference(0).unwrap() < circ);
        assert!(hull.hull_outside_area() > 0.0);
        assert!(hull.sheer_length() > hull.length());
        assert!(hull.sheer_length_extension_through_thickness() > 0.0);
        let stats = hull.summary_stats().unwrap();
        assert!(stats.contains("Length:"));
        assert!(stats.contains("Displacements:"));
    }

    #[test]
    fn min_max_round_out() {
        let hull = test_hull();
        let (min_x, max_x) = hull.min_max_length(true);
        assert_relative_eq!(min_x, -3.0);
        assert_relative_eq!(max_x, 27.0);
        let (min_y, max_y) = hull.min_max_vertical(false);
        assert_relative_eq!(min_y, 0.0);
        assert_relative_eq!(max_y, 12.0);
    }
}
