//! Server-rendered HTML dashboard.
//!
//! Pages are handlebars templates compiled into the binary. The `DashboardView` travels to the
//! browser as embedded JSON; Leaflet draws the map and Chart.js the bar charts from it.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason, TemplateError,
};
use pitstop_core::dashboard::DashboardView;
use pitstop_core::report::{Header, Section, LOADING_STATUS};
use serde::Serialize;

const HEAD_TEMPLATE: &str = include_str!("../templates/head.hbs");
const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.hbs");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.hbs");

/// Serialize a value for a `<script>` block; `</` is escaped so the data cannot close the tag
pub fn json_for_script<T: Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// # script json helper
/// writes its parameter as JSON that is safe inside a `<script>` element
///
/// ### usage
/// ```handlebars
/// {{{script_json view}}}
/// ```
#[derive(Clone, Copy)]
pub struct ScriptJson;

impl HelperDef for ScriptJson {
    fn call<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let param = helper
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("script_json", 0))?;
        let json = json_for_script(param.value())
            .map_err(|e| RenderErrorReason::Other(format!("script_json: {}", e)))?;
        out.write(&json)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct SelectOption<'a> {
    value: &'a str,
    selected: bool,
}

/// One section flattened for the template; every field is always present
#[derive(Serialize, Default)]
struct SectionBlock<'a> {
    index: usize,
    is_map: bool,
    is_text: bool,
    is_chart: bool,
    is_empty_chart: bool,
    text: &'a str,
    title: &'a str,
    width: u32,
    height: u32,
}

impl<'a> SectionBlock<'a> {
    fn new(index: usize, section: &'a Section) -> Self {
        match section {
            Section::Map { map } => Self {
                index,
                is_map: true,
                width: map.width,
                height: map.height,
                ..Default::default()
            },
            Section::Text { text } => Self {
                index,
                is_text: true,
                text,
                ..Default::default()
            },
            Section::Chart { chart } => Self {
                index,
                is_chart: !chart.is_empty(),
                is_empty_chart: chart.is_empty(),
                title: &chart.title,
                ..Default::default()
            },
        }
    }
}

#[derive(Serialize)]
struct DashboardPage<'a> {
    title: &'a str,
    sidebar_title: &'a str,
    sidebar_info: &'a str,
    status: &'a str,
    loading_status: &'a str,
    basemaps: Vec<SelectOption<'a>>,
    circuits: Vec<SelectOption<'a>>,
    has_report: bool,
    sections: Vec<SectionBlock<'a>>,
    message: &'a str,
    view: &'a DashboardView,
}

impl<'a> DashboardPage<'a> {
    fn new(view: &'a DashboardView) -> Self {
        let selected = view.selection.circuit();
        Self {
            title: &view.header.title,
            sidebar_title: &view.header.sidebar_title,
            sidebar_info: &view.header.sidebar_info,
            status: &view.header.status,
            loading_status: LOADING_STATUS,
            basemaps: view
                .basemaps
                .iter()
                .map(|basemap| SelectOption {
                    value: basemap.display_name(),
                    selected: *basemap == view.basemap,
                })
                .collect(),
            circuits: view
                .circuits
                .iter()
                .map(|circuit| SelectOption {
                    value: circuit,
                    selected: Some(circuit.as_str()) == selected,
                })
                .collect(),
            has_report: view.report.is_some(),
            sections: view
                .report
                .iter()
                .flat_map(|report| report.sections.iter().enumerate())
                .map(|(index, section)| SectionBlock::new(index, section))
                .collect(),
            message: view.message.as_deref().unwrap_or_default(),
            view,
        }
    }
}

#[derive(Serialize)]
struct ErrorPage<'a> {
    title: &'a str,
    message: &'a str,
    details: Option<&'a str>,
}

/// Template registry for the dashboard and error pages
#[derive(Debug, Clone)]
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_helper("script_json", Box::new(ScriptJson));
        registry.register_template_string("head", HEAD_TEMPLATE)?;
        registry.register_template_string("dashboard", DASHBOARD_TEMPLATE)?;
        registry.register_template_string("error", ERROR_TEMPLATE)?;
        Ok(Self { registry })
    }

    pub fn render_dashboard(&self, view: &DashboardView) -> Result<String, RenderError> {
        self.registry.render("dashboard", &DashboardPage::new(view))
    }

    pub fn render_error(&self, message: &str, details: Option<&str>) -> Result<String, RenderError> {
        let header = Header::default();
        let page = ErrorPage {
            title: &header.title,
            message,
            details,
        };
        self.registry.render("error", &page)
    }
}
