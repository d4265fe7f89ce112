use crate::indicators::TechnicalSnapshot;
use crate::processor::{pcr_sentiment, OptionChainAnalytics, PcrSentiment};
use crate::rules::{Bias, BiasResult, SignalSide};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Everything the report shows. Borrowed from the pipeline stages.
pub struct ReportContext<'a> {
    pub symbol: &'a str,
    pub generated_at: NaiveDateTime,
    pub expiry: NaiveDate,
    pub days_to_expiry: i64,
    pub technicals: &'a TechnicalSnapshot,
    pub options: Option<&'a OptionChainAnalytics>,
    pub bias: &'a BiasResult,
    pub run_log_url: &'a str,
}

pub fn render_subject(ctx: &ReportContext) -> String {
    format!(
        "{} Market Bias: {} ({}) - {}",
        ctx.symbol,
        ctx.bias.bias,
        ctx.bias.confidence,
        ctx.generated_at.format("%d %b %Y %H:%M")
    )
}

/// Self-contained HTML document with inline styles
pub fn render_report(ctx: &ReportContext) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head>\
         <body style=\"font-family:Arial,Helvetica,sans-serif;background:#f4f6f8;margin:0;padding:20px;color:#222\">\
         <div style=\"max-width:680px;margin:auto;background:#fff;border-radius:8px;padding:24px\">",
    );

    render_header(&mut html, ctx);
    render_scores(&mut html, ctx.bias);
    render_technicals(&mut html, ctx.technicals);
    render_options(&mut html, ctx);
    render_levels(&mut html, ctx.bias);
    render_iron_condor(&mut html, ctx.bias);
    render_footer(&mut html, ctx);

    html.push_str("</div></body></html>");
    html
}

fn bias_color(bias: Bias) -> &'static str {
    match bias {
        Bias::Bullish => "#1e8e3e",
        Bias::Bearish => "#d93025",
        Bias::Sideways => "#f29900",
    }
}

fn section_title(html: &mut String, title: &str) {
    let _ = write!(
        html,
        "<h3 style=\"border-bottom:2px solid #e0e0e0;padding-bottom:4px;margin-top:24px\">{}</h3>",
        title
    );
}

fn table_row(html: &mut String, label: &str, value: &str) {
    let _ = write!(
        html,
        "<tr><td style=\"padding:6px 8px;color:#555\">{}</td>\
         <td style=\"padding:6px 8px;text-align:right;font-weight:bold\">{}</td></tr>",
        label, value
    );
}

fn fmt_price(value: f64) -> String {
    format!("{:.2}", value)
}

fn fmt_optional(value: Option<f64>) -> String {
    value.map(fmt_price).unwrap_or_else(|| "N/A".to_string())
}

fn render_header(html: &mut String, ctx: &ReportContext) {
    let _ = write!(
        html,
        "<h2 style=\"margin:0\">{} Weekly Bias Report</h2>\
         <p style=\"color:#777;margin:4px 0 16px\">Generated {} &middot; Expiry {} ({} days)</p>\
         <div style=\"background:{};color:#fff;border-radius:6px;padding:16px;text-align:center\">\
         <div style=\"font-size:28px;font-weight:bold\">{}</div>\
         <div>Confidence: {}</div></div>",
        escape_html(ctx.symbol),
        ctx.generated_at.format("%d %b %Y %H:%M"),
        ctx.expiry.format("%d-%b-%Y"),
        ctx.days_to_expiry,
        bias_color(ctx.bias.bias),
        ctx.bias.bias,
        ctx.bias.confidence,
    );
}

fn render_scores(html: &mut String, bias: &BiasResult) {
    section_title(html, "Signal Scores");
    let _ = write!(
        html,
        "<p>Bullish <b>{}</b> &middot; Bearish <b>{}</b> &middot; Net <b>{:+}</b></p>",
        bias.bullish_score, bias.bearish_score, bias.score_diff
    );

    html.push_str("<table style=\"width:100%;border-collapse:collapse\">");
    for signal in &bias.signals {
        let (color, arrow) = match signal.side {
            SignalSide::Bullish => ("#1e8e3e", "&#9650;"),
            SignalSide::Bearish => ("#d93025", "&#9660;"),
        };
        let _ = write!(
            html,
            "<tr><td style=\"padding:4px 8px;color:{}\">{} +{}</td>\
             <td style=\"padding:4px 8px\">{}</td><td style=\"padding:4px 8px;color:#555\">{}</td></tr>",
            color,
            arrow,
            signal.points,
            escape_html(&signal.indicator),
            escape_html(&signal.reason)
        );
    }
    html.push_str("</table>");
}

fn render_technicals(html: &mut String, tech: &TechnicalSnapshot) {
    section_title(html, "Technical Snapshot");
    html.push_str("<table style=\"width:100%;border-collapse:collapse\">");
    table_row(html, "Current Price", &fmt_price(tech.current_price));
    table_row(html, "SMA 20", &fmt_optional(tech.sma_20));
    table_row(html, "SMA 50", &fmt_optional(tech.sma_50));
    table_row(html, "SMA 200", &fmt_optional(tech.sma_200));
    table_row(html, "RSI (14)", &format!("{:.1}", tech.rsi));
    table_row(
        html,
        "MACD / Signal",
        &format!("{:.2} / {:.2}", tech.macd, tech.macd_signal),
    );
    table_row(html, "Support (60d P10)", &fmt_price(tech.support));
    table_row(html, "Resistance (60d P90)", &fmt_price(tech.resistance));
    html.push_str("</table>");
}

fn render_options(html: &mut String, ctx: &ReportContext) {
    section_title(html, "Option Chain");
    html.push_str("<table style=\"width:100%;border-collapse:collapse\">");

    match ctx.options {
        Some(oc) => {
            table_row(
                html,
                "PCR (OI)",
                &format!("{:.2} &middot; {}", oc.pcr_oi, pcr_sentiment(oc.pcr_oi)),
            );
            table_row(html, "PCR (Volume)", &format!("{:.2}", oc.pcr_volume));
            table_row(html, "ATM Strike", &format!("{:.0}", oc.atm_strike));
            table_row(html, "Max Pain", &format!("{:.0}", oc.max_pain_strike));
            table_row(
                html,
                "Max Call OI (resistance)",
                &format!("{:.0} ({:.0})", oc.max_call_oi_strike, oc.max_call_oi),
            );
            table_row(
                html,
                "Max Put OI (support)",
                &format!("{:.0} ({:.0})", oc.max_put_oi_strike, oc.max_put_oi),
            );
            html.push_str("</table>");

            html.push_str(
                "<p style=\"margin:12px 0 4px;color:#555\">Top strikes by open interest</p>\
                 <table style=\"width:100%;border-collapse:collapse;font-size:13px\">\
                 <tr style=\"background:#f0f0f0\"><th style=\"padding:4px\">Strike</th>\
                 <th style=\"padding:4px\">Call OI</th><th style=\"padding:4px\">Put OI</th>\
                 <th style=\"padding:4px\">Total</th></tr>",
            );
            for s in &oc.top_oi_strikes {
                let _ = write!(
                    html,
                    "<tr><td style=\"padding:4px;text-align:center\">{:.0}</td>\
                     <td style=\"padding:4px;text-align:right\">{:.0}</td>\
                     <td style=\"padding:4px;text-align:right\">{:.0}</td>\
                     <td style=\"padding:4px;text-align:right\">{:.0}</td></tr>",
                    s.strike, s.call_oi, s.put_oi, s.total_oi
                );
            }
            html.push_str("</table>");
        }
        None => {
            table_row(html, "PCR (OI)", &format!("N/A &middot; {}", PcrSentiment::Neutral));
            html.push_str("</table>");
            html.push_str(
                "<p style=\"color:#777\">Option chain data unavailable for this run; \
                 bias is based on price action only.</p>",
            );
        }
    }
}

fn render_levels(html: &mut String, bias: &BiasResult) {
    section_title(html, "Trade Levels");
    let levels = &bias.levels;
    html.push_str("<table style=\"width:100%;border-collapse:collapse\">");
    table_row(
        html,
        "Entry Range",
        &format!("{} - {}", fmt_price(levels.entry_low), fmt_price(levels.entry_high)),
    );
    table_row(html, "Target 1", &fmt_price(levels.target_1));
    table_row(html, "Target 2", &fmt_price(levels.target_2));
    table_row(html, "Stop Loss", &fmt_price(levels.stop_loss));
    if let Some(trade) = &bias.option_trade {
        table_row(
            html,
            "Option Idea",
            &format!("Buy {:.0} {}", trade.strike, trade.kind),
        );
    }
    html.push_str("</table>");
}

fn render_iron_condor(html: &mut String, bias: &BiasResult) {
    let Some(ic) = &bias.iron_condor else {
        return;
    };

    section_title(html, "Iron Condor Setup");
    html.push_str(
        "<div style=\"background:#fff8e1;border-left:4px solid #f29900;padding:12px\">\
         <table style=\"width:100%;border-collapse:collapse\">",
    );
    table_row(html, "Sell Call", &format!("{:.0} CE", ic.sell_call));
    table_row(html, "Buy Call", &format!("{:.0} CE", ic.buy_call));
    table_row(html, "Sell Put", &format!("{:.0} PE", ic.sell_put));
    table_row(html, "Buy Put", &format!("{:.0} PE", ic.buy_put));
    table_row(
        html,
        "Profit Zone",
        &format!("{} - {}", fmt_price(ic.profit_low), fmt_price(ic.profit_high)),
    );
    html.push_str("</table></div>");
}

fn render_footer(html: &mut String, ctx: &ReportContext) {
    let _ = write!(
        html,
        "<p style=\"margin-top:28px;font-size:12px;color:#888\">\
         Indicative levels only, not investment advice. \
         <a href=\"{}\" style=\"color:#1a73e8\">View run log</a></p>",
        escape_html(ctx.run_log_url)
    );
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
