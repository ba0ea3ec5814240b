fn main() -> anyhow::Result<()> {
    construct_node::internal_main()
}
