use std::io::Write;

use clap::{Args, Subcommand};
use grocer::reviews::{NewReview, ReviewUuid};

use crate::{context::AppContext, errors::CliError, render};

#[derive(Debug, Args)]
pub(crate) struct ReviewsCommand {
    #[command(subcommand)]
    command: ReviewsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReviewsSubcommand {
    /// Review a product
    Add(AddReviewArgs),
    /// List reviews of a product, newest first
    List {
        /// Product id
        product_id: String,
    },
    /// Average rating and star histogram of a product
    Summary {
        /// Product id
        product_id: String,
    },
    /// Vote a review helpful
    Helpful {
        /// Review id
        review_id: ReviewUuid,
    },
}

#[derive(Debug, Args)]
struct AddReviewArgs {
    /// Product id
    product_id: String,

    /// Author id
    #[arg(long)]
    user_id: String,

    /// Author display name
    #[arg(long)]
    user_name: String,

    /// Stars, 1 to 5
    #[arg(long, allow_negative_numbers = true)]
    rating: i64,

    /// Headline
    #[arg(long)]
    title: String,

    /// Body
    #[arg(long)]
    comment: String,
}

pub(crate) fn run(
    command: ReviewsCommand,
    context: &mut AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let storefront = &mut context.storefront;

    match command.command {
        ReviewsSubcommand::Add(args) => {
            if storefront.catalog().product(&args.product_id).is_none() {
                return Err(CliError::UnknownProduct(args.product_id));
            }

            let review = storefront.reviews_mut().add_review(NewReview {
                product_id: args.product_id,
                user_id: args.user_id,
                user_name: args.user_name,
                rating: args.rating,
                title: args.title,
                comment: args.comment,
            })?;

            writeln!(out, "added review {}", review.id)?;
        }
        ReviewsSubcommand::List { product_id } => {
            writeln!(
                out,
                "{}",
                render::reviews_table(&storefront.reviews().reviews_for(&product_id))
            )?;
        }
        ReviewsSubcommand::Summary { product_id } => {
            let reviews = storefront.reviews();

            writeln!(
                out,
                "{}",
                render::rating_summary(
                    reviews.average_rating(&product_id),
                    &reviews.rating_distribution(&product_id)
                )
            )?;
        }
        ReviewsSubcommand::Helpful { review_id } => {
            if !storefront.reviews_mut().mark_helpful(review_id)? {
                return Err(CliError::UnknownReview(review_id.to_string()));
            }

            let helpful = storefront
                .reviews()
                .review(review_id)
                .map_or(0, |review| review.helpful);

            writeln!(out, "{review_id}: {helpful} found this helpful")?;
        }
    }

    Ok(())
}
