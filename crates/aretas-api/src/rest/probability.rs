// Probability service endpoints
//
// Histograms of a sensor type's values over a time range, either flat or
// broken down by hour of day / hour of week. The density and probability
// variants evaluate the fitted histogram at caller-supplied points.

use bytes::Bytes;

use super::call::ApiRequest;
use super::client::AretasClient;
use crate::error::Error;
use crate::models::{Histogram1D, HistogramQuery, TemporalHistogram};

impl AretasClient {
    /// `GET probability/univariatehistogram`
    pub async fn univariate_histogram(
        &self,
        query: &HistogramQuery,
    ) -> Result<Option<Histogram1D>, Error> {
        let req = ApiRequest::get("probability/univariatehistogram").query_pairs(query.to_query(false));
        self.fetch(&req).await
    }

    /// Density of the histogram at each value in `x`.
    ///
    /// `GET probability/univariatehistodensity`
    pub async fn univariate_histogram_density(
        &self,
        query: &HistogramQuery,
        x: &[f64],
    ) -> Result<Option<Vec<f64>>, Error> {
        let req = ApiRequest::get("probability/univariatehistodensity")
            .query_pairs(query.to_query(false))
            .query_pairs(points("X", x));
        self.fetch(&req).await
    }

    /// Probability of each value in `x`.
    ///
    /// `GET probability/univariatehistoprobability`
    pub async fn univariate_histogram_probability(
        &self,
        query: &HistogramQuery,
        x: &[f64],
    ) -> Result<Option<Vec<f64>>, Error> {
        let req = ApiRequest::get("probability/univariatehistoprobability")
            .query_pairs(query.to_query(false))
            .query_pairs(points("X", x));
        self.fetch(&req).await
    }

    /// `GET probability/temporalunivariatehisto`
    pub async fn temporal_univariate_histogram(
        &self,
        query: &HistogramQuery,
    ) -> Result<Option<TemporalHistogram>, Error> {
        let req = ApiRequest::get("probability/temporalunivariatehisto").query_pairs(query.to_query(true));
        self.fetch(&req).await
    }

    /// Density of each `(x[i], y[i])` value/timestamp pair.
    ///
    /// `GET probability/temporalunivariatehistodensity`. Fails with
    /// [`Error::InvalidArgument`] before any request when the lengths differ.
    pub async fn temporal_univariate_histogram_density(
        &self,
        query: &HistogramQuery,
        x: &[f64],
        y: &[i64],
    ) -> Result<Option<Vec<f64>>, Error> {
        let req = temporal_points_request("probability/temporalunivariatehistodensity", query, x, y)?;
        self.fetch(&req).await
    }

    /// Probability of each `(x[i], y[i])` value/timestamp pair.
    ///
    /// `GET probability/temporalunivariatehistoprobability`. Fails with
    /// [`Error::InvalidArgument`] before any request when the lengths differ.
    pub async fn temporal_univariate_histogram_probability(
        &self,
        query: &HistogramQuery,
        x: &[f64],
        y: &[i64],
    ) -> Result<Option<Vec<f64>>, Error> {
        let req =
            temporal_points_request("probability/temporalunivariatehistoprobability", query, x, y)?;
        self.fetch(&req).await
    }

    /// PNG heat map of the temporal histogram.
    ///
    /// `GET probability/temporalunivariateimage`
    pub async fn temporal_univariate_image(
        &self,
        query: &HistogramQuery,
        scale_factor: u32,
        palette_choice: u32,
    ) -> Result<Option<Bytes>, Error> {
        let req = ApiRequest::get("probability/temporalunivariateimage")
            .query_pairs(query.to_query(true))
            .query("scaleFactor", scale_factor)
            .query("paletteChoice", palette_choice);
        self.fetch_bytes(&req).await
    }
}

fn points<T: ToString>(key: &'static str, values: &[T]) -> Vec<(&'static str, String)> {
    values.iter().map(|v| (key, v.to_string())).collect()
}

fn temporal_points_request(
    path: &'static str,
    query: &HistogramQuery,
    x: &[f64],
    y: &[i64],
) -> Result<ApiRequest, Error> {
    if x.len() != y.len() {
        return Err(Error::InvalidArgument(format!(
            "X and Y must be of the same length ({} != {})",
            x.len(),
            y.len()
        )));
    }
    Ok(ApiRequest::get(path)
        .query_pairs(query.to_query(true))
        .query_pairs(points("X", x))
        .query_pairs(points("Y", y)))
}
