use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting dashboard report...");

        tracing::info!("Fetching donors, inventory and campaigns...");
        let snapshot = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched {} donors, {} inventory groups, {} campaigns",
            snapshot.donors.len(),
            snapshot.inventory.units.len(),
            snapshot.campaigns.len()
        );

        tracing::info!("Evaluating eligibility and stock levels...");
        let report = self.pipeline.transform(snapshot).await?;
        tracing::info!(
            "Evaluated {} donors ({} availability advisories), {} critical blood groups",
            report.donors.len(),
            report.availability_advisories,
            report.critical_groups.len()
        );

        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(output_path)
    }
}
