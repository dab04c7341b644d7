use crate::collection::SeriesCollection;
use crate::image_source::probe_image;
use crate::io::ensure_extension;
use crate::plot_view::{PlotDocument, PlotRenderer};
use crate::settings::{DigitizerSettings, SettingsPatch};
use series::{save_series_file, DigitizerError, GraphSeries, Point};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Digitizing state of one client: a set of series tabs with one active tab,
/// plus the collection used for combined previews.
#[derive(Debug, Clone)]
pub struct DigitizerSession {
    tabs: Vec<GraphSeries>,
    active: usize,
    next_tab_number: usize,
    template: DigitizerSettings,
    collection: SeriesCollection,
}

impl Default for DigitizerSession {
    fn default() -> Self {
        Self::new(DigitizerSettings::default())
    }
}

impl DigitizerSession {
    pub fn new(template: DigitizerSettings) -> Self {
        let mut session = Self {
            tabs: Vec::new(),
            active: 0,
            next_tab_number: 1,
            template,
            collection: SeriesCollection::new(),
        };
        session.new_tab(None);
        session
    }

    /// Opens a tab styled from the session defaults and makes it active.
    pub fn new_tab(&mut self, name: Option<&str>) -> usize {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Graph {}", self.next_tab_number),
        };
        self.next_tab_number += 1;
        self.tabs.push(self.template.new_series(&name));
        self.active = self.tabs.len() - 1;
        self.active
    }

    pub fn select_tab(&mut self, index: usize) -> Result<(), DigitizerError> {
        if index >= self.tabs.len() {
            return Err(DigitizerError::IndexOutOfRange {
                index,
                len: self.tabs.len(),
            });
        }
        self.active = index;
        Ok(())
    }

    /// Closing the last tab leaves a fresh one in its place.
    pub fn close_tab(&mut self, index: usize) -> Result<GraphSeries, DigitizerError> {
        if index >= self.tabs.len() {
            return Err(DigitizerError::IndexOutOfRange {
                index,
                len: self.tabs.len(),
            });
        }
        let closed = self.tabs.remove(index);
        if self.tabs.is_empty() {
            self.new_tab(None);
        } else if self.active > index || self.active >= self.tabs.len() {
            self.active -= 1;
        }
        Ok(closed)
    }

    pub fn tabs(&self) -> &[GraphSeries] {
        &self.tabs
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &GraphSeries {
        &self.tabs[self.active]
    }

    pub fn active_mut(&mut self) -> &mut GraphSeries {
        &mut self.tabs[self.active]
    }

    pub fn template(&self) -> &DigitizerSettings {
        &self.template
    }

    pub fn set_template(&mut self, template: DigitizerSettings) {
        self.template = template;
    }

    /// Probes the image at `path` and attaches it to the active tab, clearing
    /// its points.
    pub fn load_image(&mut self, path: &Path) -> Result<(u32, u32), DigitizerError> {
        let image = probe_image(path)?;
        let size = (image.extent.width(), image.extent.height());
        self.active_mut().load_image(image);
        Ok(size)
    }

    /// Adds a point from a click on the image. Clicks outside the image are
    /// ignored and yield `Ok(None)`.
    pub fn click(&mut self, px: f64, py: f64) -> Result<Option<Point>, DigitizerError> {
        match self.active_mut().add_point(px, py) {
            Ok(point) => Ok(Some(point)),
            Err(DigitizerError::PointOutOfBounds { x, y }) => {
                log::debug!("ignoring click at ({x}, {y}) outside the image");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn undo(&mut self) -> Option<Point> {
        self.active_mut().remove_last()
    }

    pub fn clear_points(&mut self) {
        self.active_mut().clear();
    }

    /// Applies a labels/bounds/style patch to the active tab. Nothing changes
    /// if the resulting calibration is invalid.
    pub fn apply_series_settings_json(&mut self, json: &str) -> Result<(), DigitizerError> {
        let patch = SettingsPatch::from_json(json)?;
        let mut updated = self.active().clone();
        patch.apply_to_series(&mut updated)?;
        *self.active_mut() = updated;
        Ok(())
    }

    pub fn export_json(&self, path: &Path) -> Result<PathBuf, DigitizerError> {
        let path = ensure_extension(path, "json");
        save_series_file(self.active(), &path)?;
        Ok(path)
    }

    pub fn export_plot(
        &self,
        renderer: &dyn PlotRenderer,
        path: &Path,
        title: Option<&str>,
    ) -> Result<PathBuf, DigitizerError> {
        let mut document = PlotDocument::from_series(self.active())?;
        if let Some(title) = title {
            document = document.with_title(title);
        }
        render_document(renderer, &document, path)
    }

    /// Renders every series in the session collection on one canvas.
    pub fn export_overlay(
        &self,
        renderer: &dyn PlotRenderer,
        path: &Path,
        title: Option<&str>,
    ) -> Result<PathBuf, DigitizerError> {
        let mut document = self.collection.render_overlay()?;
        if let Some(title) = title {
            document = document.with_title(title);
        }
        render_document(renderer, &document, path)
    }

    pub fn collection(&self) -> &SeriesCollection {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut SeriesCollection {
        &mut self.collection
    }
}

pub fn render_document(
    renderer: &dyn PlotRenderer,
    document: &PlotDocument,
    path: &Path,
) -> Result<PathBuf, DigitizerError> {
    let path = ensure_extension(path, renderer.format().extension());
    renderer.render(document, &path)?;
    log::info!(
        "wrote {} plot with {} points to {}",
        renderer.format(),
        document.point_count(),
        path.display()
    );
    Ok(path)
}

/// Sessions keyed by client-chosen id. New sessions take their tab defaults
/// from the store's template.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, DigitizerSession>,
    template: DigitizerSettings,
}

impl SessionStore {
    pub fn new(template: DigitizerSettings) -> Self {
        Self {
            sessions: HashMap::new(),
            template,
        }
    }

    pub fn session_mut(&mut self, id: &str) -> &mut DigitizerSession {
        let template = &self.template;
        self.sessions.entry(id.to_string()).or_insert_with(|| {
            log::debug!("opening session '{id}'");
            DigitizerSession::new(template.clone())
        })
    }

    pub fn get(&self, id: &str) -> Option<&DigitizerSession> {
        self.sessions.get(id)
    }

    pub fn close(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// New tabs in every session use `template` from now on. Existing tabs
    /// keep their settings.
    pub fn set_template(&mut self, template: DigitizerSettings) {
        for session in self.sessions.values_mut() {
            session.set_template(template.clone());
        }
        self.template = template;
    }
}
