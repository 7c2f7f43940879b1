use crate::infra::{feed_paths, load_service};
use candidate_insights::dashboard::router::StatsResponse;
use candidate_insights::dashboard::{
    CountEntry, EducationTier, FeedStatus, FilterOptions, FilterState,
};
use candidate_insights::error::AppError;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FilterArgs {
    #[arg(long)]
    pub(crate) province: Option<String>,
    #[arg(long)]
    pub(crate) district: Option<String>,
    #[arg(long)]
    pub(crate) constituency: Option<u32>,
    #[arg(long)]
    pub(crate) party: Option<String>,
    /// Education tier label, e.g. "Bachelors" or "SLC/SEE"
    #[arg(long)]
    pub(crate) qualification: Option<EducationTier>,
    #[arg(long)]
    pub(crate) gender: Option<String>,
    #[arg(long)]
    pub(crate) age_min: Option<u16>,
    #[arg(long)]
    pub(crate) age_max: Option<u16>,
    /// Case-insensitive match against name, party and district
    #[arg(long)]
    pub(crate) search: Option<String>,
}

impl FilterArgs {
    pub(crate) fn into_filters(self) -> FilterState {
        FilterState::new()
            .with_province(self.province)
            .with_district(self.district)
            .with_constituency(self.constituency)
            .with_party(self.party)
            .with_qualification(self.qualification)
            .with_gender(self.gender)
            .with_age_range(self.age_min, self.age_max)
            .with_search(self.search)
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct StatsArgs {
    /// Candidate feed path; repeat to add fallbacks in order
    #[arg(long = "feed")]
    pub(crate) feeds: Vec<PathBuf>,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Number of parties listed in the text report
    #[arg(long, default_value_t = 10)]
    pub(crate) top: usize,
    /// Print the JSON payload served by the stats endpoint instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OptionsArgs {
    /// Candidate feed path; repeat to add fallbacks in order
    #[arg(long = "feed")]
    pub(crate) feeds: Vec<PathBuf>,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
}

pub(crate) fn run_stats_report(args: StatsArgs) -> Result<(), AppError> {
    let StatsArgs {
        feeds,
        filters,
        top,
        json,
    } = args;

    let filters = filters.into_filters();
    let (service, status) = load_service(feed_paths(feeds)?);
    let snapshot = service.snapshot(&filters);
    let response = StatsResponse {
        filters,
        matched: snapshot.matched,
        headline: snapshot.headline.clone(),
        summary: snapshot.stats.summary(),
        feed: status,
    };

    if json {
        let rendered = serde_json::to_string_pretty(&response).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_stats(&response, top);
    }
    Ok(())
}

pub(crate) fn run_options_report(args: OptionsArgs) -> Result<(), AppError> {
    let filters = args.filters.into_filters();
    let (service, status) = load_service(feed_paths(args.feeds)?);
    let options = service.options(&filters);

    render_feed_status(&status);
    let selection = options.revalidate(&filters);
    if selection != filters {
        println!("Selection adjusted: values not present in the dataset were cleared");
    }
    render_options(&options);
    Ok(())
}

fn render_feed_status(status: &FeedStatus) {
    match status {
        FeedStatus::Loaded {
            source,
            records,
            skipped,
            loaded_at,
        } => {
            println!("Feed: {source} ({records} candidates, {skipped} rows skipped, loaded {loaded_at})");
        }
        FeedStatus::Unavailable { attempts, .. } => {
            println!("Feed unavailable; showing an empty dataset");
            for attempt in attempts {
                println!("  - {}: {}", attempt.source, attempt.error);
            }
        }
        FeedStatus::Pending => println!("Feed not loaded yet"),
    }
}

fn render_stats(response: &StatsResponse, top: usize) {
    render_feed_status(&response.feed);
    if !response.filters.is_empty() {
        println!("Filters: {}", describe_filters(&response.filters));
    }

    let headline = &response.headline;
    println!("\nCandidate overview");
    println!(
        "- {} candidates | {} parties | {} districts",
        headline.total, headline.parties, headline.districts
    );
    match headline.average_age {
        Some(age) => println!(
            "- {:.1}% female | average age {:.1}",
            headline.female_share, age
        ),
        None => println!("- {:.1}% female | average age unknown", headline.female_share),
    }
    if let Some(party) = &headline.leading_party {
        println!("- Leading party: {party}");
    }

    let summary = &response.summary;
    render_section("Top parties", summary.top_parties(top));
    render_section("Provinces", &summary.provinces);
    render_section("Gender", &summary.genders);
    render_section("Education", &summary.qualifications);
    render_section("Age groups", &summary.age_groups);
}

fn render_section(title: &str, entries: &[CountEntry]) {
    println!("\n{title}");
    if entries.is_empty() {
        println!("  (none)");
        return;
    }
    for entry in entries {
        println!("  - {}: {} ({:.1}%)", entry.label, entry.count, entry.share);
    }
}

fn render_options(options: &FilterOptions) {
    render_list("Provinces", &options.provinces);
    render_list("Districts", &options.districts);
    let constituencies: Vec<String> = options
        .constituencies
        .iter()
        .map(u32::to_string)
        .collect();
    render_list("Constituencies", &constituencies);
    render_list("Parties", &options.parties);
    let tiers: Vec<String> = options
        .qualifications
        .iter()
        .map(|tier| tier.label().to_string())
        .collect();
    render_list("Education", &tiers);
    render_list("Gender", &options.genders);
}

fn render_list(title: &str, values: &[String]) {
    if values.is_empty() {
        println!("{title}: (none)");
    } else {
        println!("{title}: {}", values.join(", "));
    }
}

fn describe_filters(filters: &FilterState) -> String {
    let mut parts = Vec::new();
    let mut push = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            parts.push(format!("{name}={value}"));
        }
    };
    push("province", filters.province.clone());
    push("district", filters.district.clone());
    push("constituency", filters.constituency.map(|c| c.to_string()));
    push("party", filters.party.clone());
    push("qualification", filters.qualification.map(|t| t.to_string()));
    push("gender", filters.gender.clone());
    push("age_min", filters.age_min.map(|a| a.to_string()));
    push("age_max", filters.age_max.map(|a| a.to_string()));
    push("search", filters.search_text().map(str::to_string));
    parts.join(" ")
}
