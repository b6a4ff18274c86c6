// src/services/chart_service.rs

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb, TreeParsing, TreeTextToPath};
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{
    common::error::AppError,
    models::dashboard::{CategoryTotal, HourDayPivot, MonthlyTotal, RenderedCharts, SalesSummary, WEEKDAYS},
};

type DrawResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Tema dos gráficos. Passado explicitamente para cada desenho, nada de estado global.
#[derive(Clone)]
pub struct ChartStyle {
    pub size: (u32, u32),
    pub font_family: &'static str,
    pub background: RGBAColor,
    pub text: RGBColor,
    pub tick: RGBColor,
    pub axis: RGBColor,
    pub grid: RGBColor,
    pub bar_palette: Vec<RGBColor>,
    pub line: RGBColor,
    pub heat_stops: Vec<RGBColor>,
}

impl Default for ChartStyle {
    // Tema escuro com fundo transparente
    fn default() -> Self {
        Self {
            size: (800, 500),
            font_family: "sans-serif",
            background: RGBColor(0, 0, 0).mix(0.0),
            text: RGBColor(0xff, 0xff, 0xff),
            tick: RGBColor(0xcc, 0xcc, 0xcc),
            axis: RGBColor(0x44, 0x44, 0x44),
            grid: RGBColor(0x44, 0x44, 0x44),
            // roxo -> amarelo
            bar_palette: vec![
                RGBColor(0x0d, 0x08, 0x87),
                RGBColor(0x7e, 0x03, 0xa8),
                RGBColor(0xcc, 0x47, 0x78),
                RGBColor(0xf8, 0x95, 0x40),
                RGBColor(0xf0, 0xf9, 0x21),
            ],
            line: RGBColor(0x00, 0xf2, 0xff),
            // preto -> vermelho -> amarelo
            heat_stops: vec![
                RGBColor(0x00, 0x00, 0x04),
                RGBColor(0x42, 0x0a, 0x68),
                RGBColor(0x93, 0x26, 0x67),
                RGBColor(0xdd, 0x51, 0x3a),
                RGBColor(0xfc, 0xa5, 0x0a),
                RGBColor(0xfc, 0xff, 0xa4),
            ],
        }
    }
}

impl ChartStyle {
    fn title_font(&self) -> TextStyle<'static> {
        (self.font_family, 22).into_font().color(&self.text)
    }

    fn label_font(&self) -> TextStyle<'static> {
        (self.font_family, 14).into_font().color(&self.tick)
    }

    pub fn bar_color(&self, index: usize) -> RGBColor {
        if self.bar_palette.is_empty() {
            return self.line;
        }
        self.bar_palette[index % self.bar_palette.len()]
    }

    /// Cor da célula do heatmap: interpola linearmente entre os `heat_stops`.
    pub fn heat_color(&self, value: u32, max: u32) -> RGBColor {
        let stops = &self.heat_stops;
        match stops.len() {
            0 => return self.background_rgb(),
            1 => return stops[0],
            _ => {}
        }
        if max == 0 {
            return stops[0];
        }

        let t = (f64::from(value) / f64::from(max)).clamp(0.0, 1.0);
        let scaled = t * (stops.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - i as f64;

        let (a, b) = (stops[i], stops[i + 1]);
        RGBColor(lerp(a.0, b.0, frac), lerp(a.1, b.1, frac), lerp(a.2, b.2, frac))
    }

    fn background_rgb(&self) -> RGBColor {
        RGBColor(self.background.0, self.background.1, self.background.2)
    }
}

fn lerp(from: u8, to: u8, t: f64) -> u8 {
    (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

// Deixa uma folga acima da maior barra
fn y_ceiling(max: f64) -> f64 {
    if max <= 0.0 { 1.0 } else { max * 1.1 }
}

fn segment_label<T, F>(value: &SegmentValue<i32>, items: &[T], label: F) -> String
where
    F: Fn(&T) -> String,
{
    match value {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .map(label)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

// ---
// Desenho (SVG)
// ---

/// Gráfico de barras: receita por categoria.
pub fn draw_category_revenue(totals: &[CategoryTotal], style: &ChartStyle) -> DrawResult<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, style.size).into_drawing_area();
        root.fill(&style.background)?;

        let max = totals.iter().map(|t| to_f64(t.revenue)).fold(0.0, f64::max);
        let bars = totals.len().max(1) as i32;

        let mut chart = ChartBuilder::on(&root)
            .caption("Receita por Categoria", style.title_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d((0..bars).into_segmented(), 0f64..y_ceiling(max))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(style.grid.mix(0.3))
            .light_line_style(style.grid.mix(0.0))
            .axis_style(style.axis)
            .label_style(style.label_font())
            .axis_desc_style(style.label_font())
            .x_labels(totals.len() + 1)
            .x_label_formatter(&|x| segment_label(x, totals, |t| t.category.to_string()))
            .y_desc("Receita ($)")
            .x_desc("Categoria")
            .draw()?;

        chart.draw_series(totals.iter().enumerate().map(|(i, total)| {
            let x = i as i32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(x), 0.0),
                    (SegmentValue::Exact(x + 1), to_f64(total.revenue)),
                ],
                style.bar_color(i).filled(),
            );
            bar.set_margin(0, 0, 10, 10);
            bar
        }))?;

        root.present()?;
    }
    Ok(buffer)
}

/// Gráfico de linha: receita mês a mês, com área preenchida embaixo.
pub fn draw_monthly_trend(totals: &[MonthlyTotal], style: &ChartStyle) -> DrawResult<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, style.size).into_drawing_area();
        root.fill(&style.background)?;

        let max = totals.iter().map(|t| to_f64(t.revenue)).fold(0.0, f64::max);
        let months = totals.len().max(1) as i32;

        let mut chart = ChartBuilder::on(&root)
            .caption("Tendência Mensal de Receita", style.title_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d((0..months).into_segmented(), 0f64..y_ceiling(max))?;

        chart
            .configure_mesh()
            .bold_line_style(style.grid.mix(0.3))
            .light_line_style(style.grid.mix(0.0))
            .axis_style(style.axis)
            .label_style(style.label_font())
            .axis_desc_style(style.label_font())
            .x_labels(totals.len() + 1)
            .x_label_formatter(&|x| segment_label(x, totals, |t| t.month_end.format("%b %Y").to_string()))
            .y_desc("Receita ($)")
            .draw()?;

        let points: Vec<(SegmentValue<i32>, f64)> = totals
            .iter()
            .enumerate()
            .map(|(i, t)| (SegmentValue::CenterOf(i as i32), to_f64(t.revenue)))
            .collect();

        chart.draw_series(AreaSeries::new(points.iter().cloned(), 0.0, style.line.mix(0.1)))?;
        chart.draw_series(LineSeries::new(points.iter().cloned(), style.line.stroke_width(3)))?;
        chart.draw_series(
            points
                .iter()
                .map(|point| Circle::new(point.clone(), 5, style.line.filled())),
        )?;

        root.present()?;
    }
    Ok(buffer)
}

/// Heatmap: quantidade de vendas por hora (eixo y) e dia da semana (eixo x).
pub fn draw_hour_day_heatmap(pivot: &HourDayPivot, style: &ChartStyle) -> DrawResult<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, style.size).into_drawing_area();
        root.fill(&style.background)?;

        let peak = pivot.max();
        let hours: Vec<u32> = (0..24).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Horários de Pico (máx. {} vendas)", peak), style.title_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d((0..7).into_segmented(), (0..24).into_segmented())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .axis_style(style.axis)
            .label_style(style.label_font())
            .x_labels(WEEKDAYS.len() + 1)
            .y_labels(hours.len() + 1)
            .x_label_formatter(&|x| segment_label(x, &WEEKDAYS, |day| day[..3].to_string()))
            .y_label_formatter(&|y| segment_label(y, &hours, |hour| hour.to_string()))
            .draw()?;

        let cells = (0..24usize).flat_map(|hour| (0..7usize).map(move |day| (hour, day)));
        chart.draw_series(cells.map(|(hour, day)| {
            let (x, y) = (day as i32, hour as i32);
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                style.heat_color(pivot.get(hour, day), peak).filled(),
            )
        }))?;

        root.present()?;
    }
    Ok(buffer)
}

// ---
// Rasterização (SVG -> PNG)
// ---

pub fn rasterize(svg: &str, fontdb: &fontdb::Database) -> Result<Vec<u8>, AppError> {
    let opt = usvg::Options::default();
    let mut tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| AppError::ChartRender(format!("SVG inválido: {}", e)))?;
    tree.convert_text(fontdb);

    let rtree = resvg::Tree::from_usvg(&tree);
    let pixmap_size = resvg::IntSize::from_usvg(rtree.size);
    let mut pixmap = tiny_skia::Pixmap::new(pixmap_size.width(), pixmap_size.height())
        .ok_or_else(|| AppError::ChartRender("Falha ao criar o pixmap".to_string()))?;
    rtree.render(tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| AppError::ChartRender(format!("Falha ao codificar PNG: {}", e)))
}

fn svg_to_base64_png(svg: DrawResult<String>, fontdb: &fontdb::Database) -> Result<String, AppError> {
    let svg = svg.map_err(|e| AppError::ChartRender(e.to_string()))?;
    let png = rasterize(&svg, fontdb)?;
    Ok(STANDARD.encode(png))
}

/// Desenha os três gráficos. Todos os buffers pertencem a esta chamada e são
/// liberados ao retornar, com sucesso ou erro.
pub fn render_charts(
    summary: &SalesSummary,
    style: &ChartStyle,
    fontdb: &fontdb::Database,
) -> Result<RenderedCharts, AppError> {
    Ok(RenderedCharts {
        category_revenue: svg_to_base64_png(draw_category_revenue(&summary.category_totals, style), fontdb)?,
        monthly_trend: svg_to_base64_png(draw_monthly_trend(&summary.monthly_totals, style), fontdb)?,
        hour_day_heatmap: svg_to_base64_png(draw_hour_day_heatmap(&summary.hour_day_pivot, style), fontdb)?,
    })
}

#[derive(Clone)]
pub struct ChartService {
    style: Arc<ChartStyle>,
    fontdb: Arc<fontdb::Database>,
}

impl ChartService {
    // Carrega as fontes do sistema uma vez só; sem fontes os gráficos saem sem texto.
    pub fn new(style: ChartStyle) -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::info!("🎨 {} fontes carregadas para os gráficos", fontdb.len());
        Self::with_fonts(style, fontdb)
    }

    pub fn with_fonts(style: ChartStyle, fontdb: fontdb::Database) -> Self {
        Self {
            style: Arc::new(style),
            fontdb: Arc::new(fontdb),
        }
    }

    /// Renderiza fora do runtime async (CPU pesado).
    pub async fn render(&self, summary: &SalesSummary) -> Result<RenderedCharts, AppError> {
        let style = Arc::clone(&self.style);
        let fontdb = Arc::clone(&self.fontdb);
        let summary = summary.clone();

        tokio::task::spawn_blocking(move || render_charts(&summary, &style, &fontdb))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de renderização: {}", e))?
    }
}
