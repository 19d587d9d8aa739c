use std::fmt::Debug;
use tracing::error;
use wedding_planner_infra::WeddingContext;

#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response;
    type Error: Debug;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &WeddingContext) -> Result<Self::Response, Self::Error>;
}

#[tracing::instrument(name = "UseCase executed", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &WeddingContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case error: {:?}", e);
    }

    res
}
